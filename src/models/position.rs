//! Position model for resolved geographic fixes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo;

/// A resolved geographic position
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Position {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Horizontal accuracy radius in meters, when the source reports one
    pub accuracy: Option<f64>,
    /// Instant the fix was resolved
    pub timestamp: DateTime<Utc>,
}

impl Position {
    /// Create a position resolved now, without accuracy information
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a position with accuracy and an explicit resolution instant
    #[must_use]
    pub fn with_accuracy(
        latitude: f64,
        longitude: f64,
        accuracy: Option<f64>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            timestamp,
        }
    }

    /// Both coordinates are finite
    #[must_use]
    pub fn is_valid(&self) -> bool {
        geo::is_valid_coordinate(self.latitude, self.longitude)
    }

    /// Great-circle distance to another point in kilometers
    #[must_use]
    pub fn distance_km_to(&self, latitude: f64, longitude: f64) -> f64 {
        geo::distance_km(self.latitude, self.longitude, latitude, longitude)
    }

    /// Format position as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Outcome of a location resolution: a live or cached fix, or the default fallback
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub position: Position,
    pub accuracy: Option<f64>,
    /// True when `position` is the hardcoded default rather than a real fix
    pub is_default: bool,
    /// User-facing explanation, set for fallbacks
    pub message: Option<String>,
}

impl ResolvedLocation {
    /// Wrap a real fix
    #[must_use]
    pub fn fix(position: Position) -> Self {
        Self {
            accuracy: position.accuracy,
            position,
            is_default: false,
            message: None,
        }
    }

    /// Wrap the default location with an explanation of why it was used
    #[must_use]
    pub fn fallback(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            accuracy: None,
            is_default: true,
            message: Some(message.into()),
        }
    }

    /// Short status line for the UI: the fallback explanation or the fix accuracy
    #[must_use]
    pub fn status_message(&self) -> Option<String> {
        if self.is_default {
            return self.message.clone();
        }
        self.accuracy
            .map(|accuracy| format!("Location: {}m", accuracy.round()))
    }
}
