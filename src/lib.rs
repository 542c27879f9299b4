//! `need-coffee` - find nearby coffee shops
//!
//! This library provides the location resolution and search pipeline
//! (cached position, live fix, default fallback), search criteria
//! normalization, result ranking, a Google Places adapter, the finder that
//! ties them together from configuration, and the small
//! HTTP surface that hands the browser its map configuration.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod finder;
pub mod geo;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod places;
pub mod ranking;
pub mod search_criteria;
pub mod web;

// Re-export core types for public API
pub use cache::{Clock, LocationCache, SystemClock};
pub use config::NeedCoffeeConfig;
pub use error::NeedCoffeeError;
pub use finder::{CoffeeFinder, CoffeeSearch};
pub use location_resolver::{
    DefaultLocation, LocationResolver, PermissionState, PositionOptions, PositionProvider,
    PositionStream, PositionWatch,
};
pub use models::{CoffeePlace, PlaceDetails, PlaceRecord, Position, ResolvedLocation};
pub use places::{GooglePlacesClient, PlacesSearch, PlacesService};
pub use search_criteria::{SearchCriteria, SearchParams, SortKey};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, NeedCoffeeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
