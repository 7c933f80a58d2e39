//! Structured logging setup

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Build the filter: valid `RUST_LOG` directives win over the configured level
fn env_filter(config: &LoggingConfig, verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| {
            let level = if verbose { "debug" } else { config.level.as_str() };
            EnvFilter::new(format!("{level},hyper=warn,reqwest=warn"))
        })
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = env_filter(config, verbose, rust_log.as_deref());
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .try_init(),
        _ => registry.with(fmt::layer().with_target(false)).try_init(),
    };

    installed.map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
    tracing::debug!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(())
}
