//! Adapters for the third-party HTTP services the app depends on
//!
//! Every upstream is treated as untrusted and best-effort: each call carries
//! its own time budget and failures are classified into the crate's error
//! taxonomy so callers can decide what to absorb.

pub mod exchange_rate;
pub mod mealdb;
pub mod nominatim;
pub mod overpass;

pub use exchange_rate::{ExchangeRateApiClient, ExchangeRateSource};
pub use mealdb::{MealDbClient, RecipeSearch};
pub use nominatim::{NominatimClient, ReverseGeocoder};
pub use overpass::{OverpassClient, PoiSource};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::{FlavorFinderError, Result};

/// Build the HTTP client shared by all adapters
pub fn http_client(config: &UpstreamConfig) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| FlavorFinderError::config(format!("Failed to create HTTP client: {e}")))
}

/// Send `request` and decode a JSON body of type `T`
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| FlavorFinderError::from_transport(service, &e))?;

    let status = response.status();
    debug!(service, %status, "Upstream responded");
    if !status.is_success() {
        return Err(FlavorFinderError::unavailable(
            service,
            format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            ),
        ));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| FlavorFinderError::from_transport(service, &e))?;

    serde_json::from_slice(&body).map_err(|e| FlavorFinderError::malformed(service, e.to_string()))
}
