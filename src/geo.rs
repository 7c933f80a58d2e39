//! Great-circle distance helpers

use haversine::{Location as HaversineLocation, Units, distance};

use crate::models::Coordinates;

/// Haversine distance in kilometers on a sphere of radius 6371 km
#[must_use]
pub fn distance_km(from: &Coordinates, to: &Coordinates) -> f64 {
    let from_haversine = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to_haversine = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from_haversine, to_haversine, Units::Kilometers)
}

/// Distance rounded to whole meters
#[must_use]
pub fn distance_meters(from: &Coordinates, to: &Coordinates) -> u32 {
    let meters = (distance_km(from, to) * 1000.0).round();
    if meters.is_finite() && meters > 0.0 {
        meters.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
