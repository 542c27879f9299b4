//! Data models for the need-coffee application
//!
//! This module contains the core domain models organized by concern:
//! - Position: geographic fixes and resolution outcomes
//! - Place: places search records and enriched coffee places

pub mod place;
pub mod position;

// Re-export all public types for convenient access
pub use place::{CoffeePlace, PlaceDetails, PlaceRecord};
pub use position::{Position, ResolvedLocation};
