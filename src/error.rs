//! Error types and handling for the `FlavorFinder` service

use thiserror::Error;

/// Main error type for the `FlavorFinder` service
#[derive(Error, Debug)]
pub enum FlavorFinderError {
    /// Malformed coordinates or an empty query, rejected before any network call
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// An upstream call exceeded its time budget
    #[error("{service} timed out: {message}")]
    UpstreamTimeout {
        service: &'static str,
        message: String,
    },

    /// Non-2xx answer or a network failure
    #[error("{service} unavailable: {message}")]
    UpstreamUnavailable {
        service: &'static str,
        message: String,
    },

    /// The upstream answered with a body of an unexpected shape
    #[error("{service} returned an unexpected payload: {message}")]
    MalformedUpstreamPayload {
        service: &'static str,
        message: String,
    },

    /// Every upstream feeding an aggregate failed
    #[error("No usable data: {message}")]
    NoUsableData { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl FlavorFinderError {
    /// Create a new input validation error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn timeout<S: Into<String>>(service: &'static str, message: S) -> Self {
        Self::UpstreamTimeout {
            service,
            message: message.into(),
        }
    }

    pub fn unavailable<S: Into<String>>(service: &'static str, message: S) -> Self {
        Self::UpstreamUnavailable {
            service,
            message: message.into(),
        }
    }

    pub fn malformed<S: Into<String>>(service: &'static str, message: S) -> Self {
        Self::MalformedUpstreamPayload {
            service,
            message: message.into(),
        }
    }

    pub fn no_usable_data<S: Into<String>>(message: S) -> Self {
        Self::NoUsableData {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Map a transport-level reqwest failure onto the upstream taxonomy
    pub fn from_transport(service: &'static str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(service, err.to_string())
        } else if err.is_decode() {
            Self::malformed(service, err.to_string())
        } else {
            Self::unavailable(service, err.to_string())
        }
    }

    /// True for errors caused by the caller rather than by an upstream
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FlavorFinderError::InvalidInput { .. } => "Invalid location data".to_string(),
            FlavorFinderError::UpstreamTimeout { .. }
            | FlavorFinderError::UpstreamUnavailable { .. }
            | FlavorFinderError::MalformedUpstreamPayload { .. }
            | FlavorFinderError::NoUsableData { .. } => "Service unavailable".to_string(),
            FlavorFinderError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = FlavorFinderError::invalid_input("latitude out of range");
        assert!(matches!(err, FlavorFinderError::InvalidInput { .. }));
        assert!(err.is_client_error());

        let err = FlavorFinderError::timeout("nominatim", "5s elapsed");
        assert!(matches!(err, FlavorFinderError::UpstreamTimeout { .. }));
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "nominatim timed out: 5s elapsed");
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            FlavorFinderError::invalid_input("x").user_message(),
            "Invalid location data"
        );
        assert_eq!(
            FlavorFinderError::unavailable("overpass", "502").user_message(),
            "Service unavailable"
        );
        assert_eq!(
            FlavorFinderError::no_usable_data("both down").user_message(),
            "Service unavailable"
        );
        assert!(
            FlavorFinderError::config("bad")
                .user_message()
                .contains("Configuration error")
        );
    }
}
