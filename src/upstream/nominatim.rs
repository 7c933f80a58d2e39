//! Reverse geocoding through Nominatim

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::fetch_json;
use crate::models::{AreaLabel, Coordinates};
use crate::{FlavorFinderError, Result};

pub const SERVICE: &str = "nominatim";

/// Turns coordinates into a human-readable area name
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Malformed payloads resolve to the default label; timeouts and
    /// unavailability are returned so the caller can decide.
    async fn reverse_geocode(&self, at: Coordinates) -> Result<AreaLabel>;
}

pub struct NominatimClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<ReverseAddress>,
}

#[derive(Debug, Deserialize)]
struct ReverseAddress {
    city: Option<String>,
    town: Option<String>,
}

impl NominatimClient {
    pub fn new(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    #[instrument(skip(self), fields(lat = at.latitude, lon = at.longitude))]
    async fn reverse_geocode(&self, at: Coordinates) -> Result<AreaLabel> {
        let url = format!("{}/reverse", self.base_url.trim_end_matches('/'));
        let request = self
            .client
            .get(url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", at.latitude.to_string()),
                ("lon", at.longitude.to_string()),
            ])
            .timeout(self.timeout);

        match fetch_json::<ReverseResponse>(SERVICE, request).await {
            Ok(response) => {
                let label = response
                    .address
                    .map(|a| AreaLabel::from_parts(a.city.as_deref(), a.town.as_deref()))
                    .unwrap_or_default();
                debug!(area = %label, "Reverse geocoded");
                Ok(label)
            }
            Err(err @ FlavorFinderError::MalformedUpstreamPayload { .. }) => {
                warn!("Ignoring reverse geocoding payload: {}", err);
                Ok(AreaLabel::default())
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;
    use crate::upstream::http_client;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn lagos() -> Coordinates {
        Coordinates::new(6.5244, 3.3792).unwrap()
    }

    async fn geocoder(server: &MockServer) -> NominatimClient {
        let client = http_client(&UpstreamConfig::default()).unwrap();
        NominatimClient::new(client, server.uri(), Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_prefers_city_then_town() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("format", "json"))
            .and(query_param("lat", "6.5244"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": { "town": "Ikeja", "country": "Nigeria" }
            })))
            .mount(&server)
            .await;

        let label = geocoder(&server).await.reverse_geocode(lagos()).await.unwrap();
        assert_eq!(label.as_str(), "Ikeja");
    }

    #[tokio::test]
    async fn test_missing_address_gives_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "error": "Unable to geocode" })),
            )
            .mount(&server)
            .await;

        let label = geocoder(&server).await.reverse_geocode(lagos()).await.unwrap();
        assert_eq!(label, AreaLabel::default());
    }

    #[tokio::test]
    async fn test_malformed_payload_gives_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let label = geocoder(&server).await.reverse_geocode(lagos()).await.unwrap();
        assert_eq!(label, AreaLabel::default());
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "address": { "city": "Lagos" } }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = geocoder(&server)
            .await
            .reverse_geocode(lagos())
            .await
            .unwrap_err();
        assert!(matches!(err, FlavorFinderError::UpstreamTimeout { .. }));
    }
}
