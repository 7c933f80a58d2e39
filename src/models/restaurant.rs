//! Restaurant models: raw POI records from the spatial query service and
//! the normalized, UI-facing restaurant entries built from them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// Address shown when a POI carries none of the address tags
pub const ADDRESS_PLACEHOLDER: &str = "Address not available";

/// Label used when reverse geocoding yields no city or town
pub const DEFAULT_AREA: &str = "Nearby";

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One element of the POI query result
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RawPointOfInterest {
    pub id: u64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Present for way-type geometries
    #[serde(default)]
    pub center: Option<GeoPoint>,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
}

impl RawPointOfInterest {
    fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .as_ref()
            .and_then(|tags| tags.get(key))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// The `name` tag, if present and non-blank
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.tag("name")
    }

    /// Comma-joined street, house number and city, or the placeholder
    #[must_use]
    pub fn address(&self) -> String {
        let parts: Vec<&str> = ["addr:street", "addr:housenumber", "addr:city"]
            .iter()
            .filter_map(|key| self.tag(key))
            .collect();

        if parts.is_empty() {
            ADDRESS_PLACEHOLDER.to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Direct point coordinates, falling back to the way center
    #[must_use]
    pub fn position(&self) -> Option<Coordinates> {
        match (self.lat, self.lon, self.center) {
            (Some(latitude), Some(longitude), _) => Some(Coordinates {
                latitude,
                longitude,
            }),
            (_, _, Some(center)) => Some(Coordinates {
                latitude: center.lat,
                longitude: center.lon,
            }),
            _ => None,
        }
    }
}

/// Normalized restaurant entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<u32>,
    /// Decorative only, not backed by any rating source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl Restaurant {
    #[must_use]
    pub fn position(&self) -> Option<Coordinates> {
        Some(Coordinates {
            latitude: self.lat?,
            longitude: self.lon?,
        })
    }
}

/// Free-text place name derived from reverse geocoding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AreaLabel(String);

impl AreaLabel {
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self(label.into())
    }

    /// `city` preferred, else `town`, else the default label
    #[must_use]
    pub fn from_parts(city: Option<&str>, town: Option<&str>) -> Self {
        [city, town]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|part| !part.is_empty())
            .map(Self::new)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AreaLabel {
    fn default() -> Self {
        Self(DEFAULT_AREA.to_string())
    }
}

impl std::fmt::Display for AreaLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aggregated answer for one position
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Discovery {
    pub area: AreaLabel,
    pub restaurants: Vec<Restaurant>,
}
