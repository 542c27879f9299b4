//! Configuration management for the need-coffee application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::NeedCoffeeError;
use crate::location_resolver::{DefaultLocation, PositionOptions};
use crate::places::google::DEFAULT_BASE_URL;
use crate::search_criteria::{DEFAULT_RADIUS_M, MAX_RADIUS_M, MIN_RADIUS_M};

const ENV_PREFIX: &str = "NEED_COFFEE";

/// Root configuration structure for the need-coffee application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NeedCoffeeConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Map provider configuration
    #[serde(default)]
    pub maps: MapsConfig,
    /// Location resolution settings
    #[serde(default)]
    pub location: LocationConfig,
    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Deployment environment; static assets are only served outside production
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Directory holding the browser assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// PEM certificate for HTTPS
    pub tls_cert_path: Option<String>,
    /// PEM private key for HTTPS
    pub tls_key_path: Option<String>,
}

/// Map provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    /// Google Maps API key handed to the browser and used for places lookups
    pub api_key: Option<String>,
    #[serde(default = "default_places_base_url")]
    pub places_base_url: String,
    /// Places request timeout in seconds
    #[serde(default = "default_maps_timeout")]
    pub timeout_seconds: u32,
}

/// Location resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// How long a resolved position stays cached
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u32,
    /// Live position request timeout
    #[serde(default = "default_location_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_maximum_age")]
    pub maximum_age_seconds: u32,
    #[serde(default)]
    pub high_accuracy: bool,
    #[serde(default = "default_location_name")]
    pub default_name: String,
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,
}

/// Search defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Radius used before the user picks one, in meters
    #[serde(default = "default_search_radius")]
    pub default_radius_m: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_static_dir() -> String {
    "public".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "https://need-coffee.netlify.app".to_string(),
    ]
}

fn default_places_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_maps_timeout() -> u32 {
    10
}

fn default_cache_ttl() -> u32 {
    300
}

fn default_location_timeout() -> u32 {
    10
}

fn default_maximum_age() -> u32 {
    300
}

fn default_location_name() -> String {
    DefaultLocation::default().name
}

fn default_latitude() -> f64 {
    DefaultLocation::default().latitude
}

fn default_longitude() -> f64 {
    DefaultLocation::default().longitude
}

fn default_search_radius() -> f64 {
    DEFAULT_RADIUS_M
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            static_dir: default_static_dir(),
            allowed_origins: default_allowed_origins(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            places_base_url: default_places_base_url(),
            timeout_seconds: default_maps_timeout(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: default_cache_ttl(),
            timeout_seconds: default_location_timeout(),
            maximum_age_seconds: default_maximum_age(),
            high_accuracy: false,
            default_name: default_location_name(),
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_m: default_search_radius(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl LocationConfig {
    #[must_use]
    pub fn cache_ttl(&self) -> TimeDelta {
        TimeDelta::seconds(self.cache_ttl_seconds.into())
    }

    #[must_use]
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_secs(self.timeout_seconds.into()),
            maximum_age: Duration::from_secs(self.maximum_age_seconds.into()),
        }
    }

    #[must_use]
    pub fn default_location(&self) -> DefaultLocation {
        DefaultLocation {
            name: self.default_name.clone(),
            latitude: self.default_latitude,
            longitude: self.default_longitude,
        }
    }
}

impl NeedCoffeeConfig {
    /// Load configuration from `.env`, the default config file and the process environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from(None, std::env::vars().collect())
    }

    /// Load configuration from an optional file path and an explicit environment map.
    ///
    /// `NEED_COFFEE__SECTION__KEY` variables override file values. The plain
    /// `PORT`, `GOOGLE_MAPS_API_KEY` and `NODE_ENV` variables override both.
    pub fn load_from(config_path: Option<PathBuf>, env: HashMap<String, String>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .source(Some(env.clone())),
            )
            .set_override_option("server.port", env.get("PORT").cloned())
            .with_context(|| "Invalid PORT override")?
            .set_override_option("maps.api_key", env.get("GOOGLE_MAPS_API_KEY").cloned())
            .with_context(|| "Invalid GOOGLE_MAPS_API_KEY override")?
            .set_override_option("server.environment", env.get("NODE_ENV").cloned())
            .with_context(|| "Invalid NODE_ENV override")?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: NeedCoffeeConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("need-coffee").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.environment.is_empty() {
            self.server.environment = default_environment();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.maps.places_base_url.is_empty() {
            self.maps.places_base_url = default_places_base_url();
        }
        if self.maps.timeout_seconds == 0 {
            self.maps.timeout_seconds = default_maps_timeout();
        }
        if self.maps.api_key.as_deref().is_some_and(str::is_empty) {
            self.maps.api_key = None;
        }
        if self.location.cache_ttl_seconds == 0 {
            self.location.cache_ttl_seconds = default_cache_ttl();
        }
        if self.location.timeout_seconds == 0 {
            self.location.timeout_seconds = default_location_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_tls()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.maps.timeout_seconds > 120 {
            return Err(NeedCoffeeError::config("Places API timeout cannot exceed 120 seconds").into());
        }

        if self.location.timeout_seconds > 120 {
            return Err(NeedCoffeeError::config("Location timeout cannot exceed 120 seconds").into());
        }

        if self.location.cache_ttl_seconds > 86_400 {
            return Err(NeedCoffeeError::config(
                "Location cache TTL cannot exceed 86400 seconds (1 day)",
            )
            .into());
        }

        if !(-90.0..=90.0).contains(&self.location.default_latitude)
            || !(-180.0..=180.0).contains(&self.location.default_longitude)
        {
            return Err(NeedCoffeeError::config(
                "Default location coordinates are out of range",
            )
            .into());
        }

        if !(MIN_RADIUS_M..=MAX_RADIUS_M).contains(&self.search.default_radius_m) {
            return Err(NeedCoffeeError::config(format!(
                "Default search radius must be between {MIN_RADIUS_M} and {MAX_RADIUS_M} meters"
            ))
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(NeedCoffeeError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(NeedCoffeeError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.maps.places_base_url.starts_with("http://")
            && !self.maps.places_base_url.starts_with("https://")
        {
            return Err(NeedCoffeeError::config(
                "Places API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }

    fn validate_tls(&self) -> Result<()> {
        match (&self.server.tls_cert_path, &self.server.tls_key_path) {
            (Some(_), None) | (None, Some(_)) => Err(NeedCoffeeError::config(
                "TLS requires both tls_cert_path and tls_key_path",
            )
            .into()),
            _ => Ok(()),
        }
    }
}
