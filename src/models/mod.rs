//! Data models for the `FlavorFinder` service
//!
//! This module contains the core domain models organized by concern:
//! - Location: validated coordinates
//! - Restaurant: raw POI records, normalized restaurants and area labels
//! - Recipe: meals returned by the recipe search
//! - Exchange: currency rates and conversions

pub mod exchange;
pub mod location;
pub mod recipe;
pub mod restaurant;

// Re-export all public types for convenient access
pub use exchange::ExchangeRates;
pub use location::Coordinates;
pub use recipe::{Ingredient, Meal};
pub use restaurant::{AreaLabel, Discovery, GeoPoint, RawPointOfInterest, Restaurant};
