//! `FlavorFinder` - recipe search, nearby restaurant discovery and NGN/USD
//! conversion
//!
//! This library provides the upstream adapters, the restaurant aggregator,
//! the HTTP API and the client-side finder state machine.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod finder;
pub mod geo;
pub mod logging;
pub mod models;
pub mod upstream;
pub mod web;

// Re-export core types for public API
pub use aggregator::{RestaurantAggregator, RestaurantSource};
pub use config::FlavorFinderConfig;
pub use error::FlavorFinderError;
pub use finder::{FinderController, FinderSession, FinderState};
pub use models::{Coordinates, Discovery, ExchangeRates, Meal, Restaurant};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, FlavorFinderError>;
