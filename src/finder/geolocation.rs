//! One-shot position lookup with a hard time budget

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Coordinates;

/// Why no position could be obtained. The display text is what the user sees.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("Please enable location permissions")]
    PermissionDenied,
    #[error("Location unavailable - check connection")]
    Unavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Geolocation not supported - using default location")]
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Zero means a cached position is never acceptable
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

impl PositionOptions {
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError>;
}

/// Ask `geolocator` for a position, failing with `Timeout` once
/// `options.timeout` has elapsed.
pub async fn locate<G: Geolocator + ?Sized>(
    geolocator: &G,
    options: &PositionOptions,
) -> Result<Coordinates, GeolocationError> {
    match tokio::time::timeout(options.timeout, geolocator.current_position(options)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(GeolocationError::Timeout),
    }
}

/// Reports a preconfigured position, or `Unsupported` when there is none
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedGeolocator(pub Option<Coordinates>);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError> {
        self.0.ok_or(GeolocationError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stalled;

    #[async_trait]
    impl Geolocator for Stalled {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinates, GeolocationError> {
            futures::future::pending().await
        }
    }

    #[test]
    fn test_default_options() {
        let options = PositionOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_lookup_times_out() {
        let outcome = locate(&Stalled, &PositionOptions::default()).await;
        assert_eq!(outcome, Err(GeolocationError::Timeout));
    }

    #[tokio::test]
    async fn test_fixed_geolocator() {
        let options = PositionOptions::default();
        let at = Coordinates::new(9.0765, 7.3986).unwrap();
        assert_eq!(locate(&FixedGeolocator(Some(at)), &options).await, Ok(at));
        assert_eq!(
            locate(&FixedGeolocator(None), &options).await,
            Err(GeolocationError::Unsupported)
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            GeolocationError::PermissionDenied.to_string(),
            "Please enable location permissions"
        );
        assert_eq!(
            GeolocationError::Timeout.to_string(),
            "Location request timed out"
        );
    }
}
