//! Error types and handling for the need-coffee application

use std::time::Duration;

use thiserror::Error;

/// Main error type for the need-coffee application
#[derive(Error, Debug)]
pub enum NeedCoffeeError {
    /// The runtime has no positioning capability
    #[error("Positioning is not supported in this environment")]
    UnsupportedEnvironment,

    /// The user refused location access
    #[error("Location permission denied")]
    PermissionDenied,

    /// The live position request did not complete in time
    #[error("Position request timed out after {after:?}")]
    Timeout { after: Duration },

    /// The positioning subsystem could not produce a fix
    #[error("Position unavailable: {message}")]
    PositionUnavailable { message: String },

    /// The places search call failed
    #[error("Places API error: {message}")]
    SearchApi { message: String },

    /// Search criteria are not usable
    #[error("Invalid search criteria: {message}")]
    InvalidCriteria { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl NeedCoffeeError {
    /// Create a new position-unavailable error
    pub fn position_unavailable<S: Into<String>>(message: S) -> Self {
        Self::PositionUnavailable {
            message: message.into(),
        }
    }

    /// Create a new search API error
    pub fn search_api<S: Into<String>>(message: S) -> Self {
        Self::SearchApi {
            message: message.into(),
        }
    }

    /// Create a new invalid-criteria error
    pub fn invalid_criteria<S: Into<String>>(message: S) -> Self {
        Self::InvalidCriteria {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Positioning failures are recovered locally by falling back to the default location
    #[must_use]
    pub fn is_positioning_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedEnvironment
                | Self::PermissionDenied
                | Self::Timeout { .. }
                | Self::PositionUnavailable { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedEnvironment => {
                "Geolocation is not supported in this browser.".to_string()
            }
            Self::PermissionDenied => {
                "Access to location denied. To enable it, click on the location icon in the address bar."
                    .to_string()
            }
            Self::Timeout { .. } => {
                "Timeout expired. Try again or check your connection.".to_string()
            }
            Self::PositionUnavailable { .. } => {
                "Location information not available. Check your GPS/Wi-Fi connection.".to_string()
            }
            Self::SearchApi { message } => format!("Search error: {message}"),
            Self::InvalidCriteria { .. } => {
                "Search error: invalid search criteria. Set a location and radius first."
                    .to_string()
            }
            Self::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            Self::Io { .. } => "File operation failed. Please check file permissions.".to_string(),
        }
    }
}
