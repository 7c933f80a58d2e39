//! Coordinate model for the user position and restaurant positions

use serde::{Deserialize, Serialize};

use crate::{FlavorFinderError, Result};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create validated coordinates
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(FlavorFinderError::invalid_input(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }

        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(FlavorFinderError::invalid_input(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse raw query values such as `lat=6.5244&lon=3.3792`
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Result<Self> {
        let (Some(lat), Some(lon)) = (lat, lon) else {
            return Err(FlavorFinderError::invalid_input(
                "Invalid coordinates provided",
            ));
        };

        let latitude = lat.trim().parse::<f64>().map_err(|_| {
            FlavorFinderError::invalid_input(format!("Invalid latitude: {lat}"))
        })?;
        let longitude = lon.trim().parse::<f64>().map_err(|_| {
            FlavorFinderError::invalid_input(format!("Invalid longitude: {lon}"))
        })?;

        Self::new(latitude, longitude)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
