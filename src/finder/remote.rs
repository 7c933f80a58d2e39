use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::aggregator::RestaurantSource;
use crate::models::{Coordinates, Discovery};
use crate::{FlavorFinderError, Result};

pub const SERVICE: &str = "flavorfinder-api";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Restaurant source backed by a running FlavorFinder server
#[derive(Debug, Clone)]
pub struct RemoteRestaurantSource {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RemoteRestaurantSource {
    pub fn new(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl RestaurantSource for RemoteRestaurantSource {
    async fn restaurants(&self, at: Coordinates) -> Result<Discovery> {
        let url = format!("{}/api/restaurants", self.base_url);
        debug!("Requesting {} for {}", url, at.format_coordinates());
        let response = self
            .client
            .get(&url)
            .query(&[("lat", at.latitude), ("lon", at.longitude)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FlavorFinderError::from_transport(SERVICE, &e))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "Invalid location data".to_string());
            return Err(FlavorFinderError::invalid_input(message));
        }
        if !status.is_success() {
            return Err(FlavorFinderError::unavailable(
                SERVICE,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        response
            .json::<Discovery>()
            .await
            .map_err(|e| FlavorFinderError::from_transport(SERVICE, &e))
    }
}
