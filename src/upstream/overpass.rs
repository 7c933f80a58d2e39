//! Spatial restaurant lookup through the Overpass API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::fetch_json;
use crate::models::{Coordinates, RawPointOfInterest};
use crate::{FlavorFinderError, Result};

pub const SERVICE: &str = "overpass";

/// Finds restaurant-tagged map elements around a point
#[async_trait]
pub trait PoiSource: Send + Sync {
    /// Malformed payloads resolve to an empty list; timeouts and
    /// unavailability are returned so the caller can decide.
    async fn restaurants_near(
        &self,
        at: Coordinates,
        radius_meters: u32,
    ) -> Result<Vec<RawPointOfInterest>>;
}

pub struct OverpassClient {
    client: Client,
    interpreter_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    elements: Vec<RawPointOfInterest>,
}

/// Overpass QL for restaurant nodes and ways; `out center` gives ways a
/// center point so they can be placed on the map.
#[must_use]
pub fn build_query(at: Coordinates, radius_meters: u32, timeout: Duration) -> String {
    let around = format!("around:{},{},{}", radius_meters, at.latitude, at.longitude);
    format!(
        "[out:json][timeout:{}];(node[\"amenity\"=\"restaurant\"]({around});way[\"amenity\"=\"restaurant\"]({around}););out center;",
        timeout.as_secs().max(1)
    )
}

impl OverpassClient {
    pub fn new(client: Client, interpreter_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            interpreter_url: interpreter_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl PoiSource for OverpassClient {
    #[instrument(skip(self), fields(lat = at.latitude, lon = at.longitude))]
    async fn restaurants_near(
        &self,
        at: Coordinates,
        radius_meters: u32,
    ) -> Result<Vec<RawPointOfInterest>> {
        let query = build_query(at, radius_meters, self.timeout);
        let request = self
            .client
            .get(&self.interpreter_url)
            .query(&[("data", query)])
            .timeout(self.timeout);

        match fetch_json::<QueryResponse>(SERVICE, request).await {
            Ok(response) => {
                info!(
                    "Found {} restaurant elements within {}m",
                    response.elements.len(),
                    radius_meters
                );
                Ok(response.elements)
            }
            Err(err @ FlavorFinderError::MalformedUpstreamPayload { .. }) => {
                warn!("Ignoring POI payload: {}", err);
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }
}
