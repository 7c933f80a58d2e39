//! Currency exchange-rate snapshot and conversions

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{FlavorFinderError, Result};

pub const USD: &str = "USD";

/// Rates quoted as units of each currency per one unit of `base`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangeRates {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
    pub last_updated: String,
}

impl ExchangeRates {
    /// Hardcoded payload served when the live rate cannot be fetched
    #[must_use]
    pub fn fallback(base: &str, usd_rate: f64, now: DateTime<Utc>) -> Self {
        Self {
            base: base.to_string(),
            rates: BTreeMap::from([(USD.to_string(), usd_rate)]),
            last_updated: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Rate of `currency` against the base; the base itself is always 1
    #[must_use]
    pub fn rate(&self, currency: &str) -> Option<f64> {
        if currency.eq_ignore_ascii_case(&self.base) {
            return Some(1.0);
        }
        self.rates
            .get(&currency.to_ascii_uppercase())
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }

    /// Convert `amount` between two quoted currencies, crossing via the base
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64> {
        let from_rate = self.rate(from).ok_or_else(|| {
            FlavorFinderError::invalid_input(format!("No exchange rate for {from}"))
        })?;
        let to_rate = self.rate(to).ok_or_else(|| {
            FlavorFinderError::invalid_input(format!("No exchange rate for {to}"))
        })?;
        Ok(amount / from_rate * to_rate)
    }

    /// Convert an amount of the base currency into USD
    pub fn to_usd(&self, amount: f64) -> Result<f64> {
        self.convert(amount, &self.base, USD)
    }
}
