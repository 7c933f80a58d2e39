//! Live exchange rates from exchangerate-api

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

use super::fetch_json;
use crate::models::ExchangeRates;
use crate::models::exchange::USD;
use crate::{FlavorFinderError, Result};

pub const SERVICE: &str = "exchangerate-api";

#[async_trait]
pub trait ExchangeRateSource: Send + Sync {
    /// Latest rates against the configured base currency
    async fn latest(&self) -> Result<ExchangeRates>;
}

pub struct ExchangeRateApiClient {
    client: Client,
    base_url: String,
    base_currency: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: Option<String>,
    date: Option<String>,
    time_last_updated: Option<i64>,
    rates: BTreeMap<String, f64>,
}

impl LatestResponse {
    fn last_updated(&self) -> String {
        self.time_last_updated
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
            .or_else(|| self.date.clone())
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl ExchangeRateApiClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        base_currency: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            base_currency: base_currency.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ExchangeRateSource for ExchangeRateApiClient {
    #[instrument(skip(self), fields(base = %self.base_currency))]
    async fn latest(&self) -> Result<ExchangeRates> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.base_currency)
        );
        let request = self.client.get(url).timeout(self.timeout);
        let response: LatestResponse = fetch_json(SERVICE, request).await?;

        let rates = ExchangeRates {
            base: response
                .base
                .clone()
                .unwrap_or_else(|| self.base_currency.clone()),
            last_updated: response.last_updated(),
            rates: response.rates,
        };
        if rates.rate(USD).is_none() {
            return Err(FlavorFinderError::malformed(
                SERVICE,
                "USD rate missing or not positive",
            ));
        }
        info!(usd = ?rates.rate(USD), "Fetched exchange rates");
        Ok(rates)
    }
}
