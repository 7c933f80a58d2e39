//! Configuration management for the `FlavorFinder` service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::FlavorFinderError;
use crate::models::Coordinates;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the `FlavorFinder` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlavorFinderConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Upstream service endpoints and time budgets
    pub upstream: UpstreamConfig,
    /// Restaurant search settings
    pub search: SearchConfig,
    /// Exchange-rate settings
    pub exchange: ExchangeConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory with a prebuilt frontend bundle, served for non-API paths
    pub static_dir: Option<String>,
}

/// Upstream service endpoints and time budgets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// User agent sent to every upstream (required by Nominatim)
    pub user_agent: String,
    /// Reverse geocoding base URL
    pub nominatim_url: String,
    /// POI query interpreter URL
    pub overpass_url: String,
    /// Recipe search base URL
    pub mealdb_url: String,
    /// Exchange-rate base URL
    pub exchange_url: String,
    /// Reverse geocoding timeout in seconds
    pub geocode_timeout_seconds: u32,
    /// POI query timeout in seconds
    pub poi_timeout_seconds: u32,
    /// Timeout for recipe and exchange-rate calls in seconds
    pub timeout_seconds: u32,
}

/// Restaurant search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// POI search radius in meters
    pub radius_meters: u32,
    /// Restaurants per page in the finder
    pub page_size: usize,
    /// Attach a random 1-5 star rating to each restaurant
    pub decorative_ratings: bool,
    /// Fallback latitude used when live geolocation fails
    pub fallback_latitude: f64,
    /// Fallback longitude used when live geolocation fails
    pub fallback_longitude: f64,
    /// Device geolocation timeout in seconds
    pub geolocation_timeout_seconds: u32,
}

/// Exchange-rate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Local currency rates are quoted against
    pub base_currency: String,
    /// USD rate served when the live rate is unavailable
    pub fallback_usd_rate: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_user_agent() -> String {
    format!("FlavorFinder/{}", crate::VERSION)
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_mealdb_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_exchange_url() -> String {
    "https://api.exchangerate-api.com/v4/latest".to_string()
}

fn default_geocode_timeout() -> u32 {
    5
}

fn default_poi_timeout() -> u32 {
    8
}

fn default_upstream_timeout() -> u32 {
    10
}

fn default_radius() -> u32 {
    2000
}

fn default_page_size() -> usize {
    6
}

fn default_fallback_latitude() -> f64 {
    6.5244
}

fn default_fallback_longitude() -> f64 {
    3.3792
}

fn default_geolocation_timeout() -> u32 {
    10
}

fn default_base_currency() -> String {
    "NGN".to_string()
}

fn default_fallback_usd_rate() -> f64 {
    0.0012
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            nominatim_url: default_nominatim_url(),
            overpass_url: default_overpass_url(),
            mealdb_url: default_mealdb_url(),
            exchange_url: default_exchange_url(),
            geocode_timeout_seconds: default_geocode_timeout(),
            poi_timeout_seconds: default_poi_timeout(),
            timeout_seconds: default_upstream_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_meters: default_radius(),
            page_size: default_page_size(),
            decorative_ratings: true,
            fallback_latitude: default_fallback_latitude(),
            fallback_longitude: default_fallback_longitude(),
            geolocation_timeout_seconds: default_geolocation_timeout(),
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            fallback_usd_rate: default_fallback_usd_rate(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl UpstreamConfig {
    #[must_use]
    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_secs(self.geocode_timeout_seconds.into())
    }

    #[must_use]
    pub fn poi_timeout(&self) -> Duration {
        Duration::from_secs(self.poi_timeout_seconds.into())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl SearchConfig {
    /// The fixed coordinates used whenever live geolocation is not usable
    pub fn fallback(&self) -> crate::Result<Coordinates> {
        Coordinates::new(self.fallback_latitude, self.fallback_longitude)
    }

    #[must_use]
    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_secs(self.geolocation_timeout_seconds.into())
    }
}

impl FlavorFinderConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides such as FLAVORFINDER_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("FLAVORFINDER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: FlavorFinderConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("flavorfinder").join("config.toml"))
    }

    /// Apply default values to blank or zeroed configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.upstream.user_agent.is_empty() {
            self.upstream.user_agent = default_user_agent();
        }
        if self.upstream.geocode_timeout_seconds == 0 {
            self.upstream.geocode_timeout_seconds = default_geocode_timeout();
        }
        if self.upstream.poi_timeout_seconds == 0 {
            self.upstream.poi_timeout_seconds = default_poi_timeout();
        }
        if self.upstream.timeout_seconds == 0 {
            self.upstream.timeout_seconds = default_upstream_timeout();
        }
        if self.search.radius_meters == 0 {
            self.search.radius_meters = default_radius();
        }
        if self.search.page_size == 0 {
            self.search.page_size = default_page_size();
        }
        if self.search.geolocation_timeout_seconds == 0 {
            self.search.geolocation_timeout_seconds = default_geolocation_timeout();
        }
        if self.exchange.base_currency.is_empty() {
            self.exchange.base_currency = default_base_currency();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        let timeouts = [
            self.upstream.geocode_timeout_seconds,
            self.upstream.poi_timeout_seconds,
            self.upstream.timeout_seconds,
            self.search.geolocation_timeout_seconds,
        ];
        if timeouts.iter().any(|t| *t > 300) {
            return Err(
                FlavorFinderError::config("Timeouts cannot exceed 300 seconds").into(),
            );
        }

        if self.search.radius_meters == 0 || self.search.radius_meters > 50_000 {
            return Err(FlavorFinderError::config(
                "Search radius must be between 1 and 50000 meters",
            )
            .into());
        }

        if self.search.page_size == 0 || self.search.page_size > 100 {
            return Err(
                FlavorFinderError::config("Page size must be between 1 and 100").into(),
            );
        }

        self.search.fallback().map_err(|e| {
            FlavorFinderError::config(format!("Invalid fallback coordinates: {e}"))
        })?;

        if !self.exchange.fallback_usd_rate.is_finite() || self.exchange.fallback_usd_rate <= 0.0
        {
            return Err(
                FlavorFinderError::config("Fallback USD rate must be positive").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(FlavorFinderError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(FlavorFinderError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("nominatim_url", &self.upstream.nominatim_url),
            ("overpass_url", &self.upstream.overpass_url),
            ("mealdb_url", &self.upstream.mealdb_url),
            ("exchange_url", &self.upstream.exchange_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(FlavorFinderError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
