//! Location Resolution Module
//!
//! Produces a best-effort current position: permission check, cached fix,
//! live fix with a bounded timeout, and finally a fixed default location.
//! Resolution never fails; positioning errors turn into a flagged fallback.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{BoxStream, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::cache::LocationCache;
use crate::config::LocationConfig;
use crate::error::NeedCoffeeError;
use crate::models::{Position, ResolvedLocation};

/// Permission state of the positioning capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    /// The user has not decided yet; a live request will ask
    Prompt,
    /// The environment cannot report a permission state
    Unknown,
}

/// Options for a live position request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest acceptable fix the subsystem may hand back from its own cache
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: false,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(5 * 60),
        }
    }
}

impl PositionOptions {
    /// Defaults for continuous tracking: precise, short timeout, never reuse an old fix
    #[must_use]
    pub fn watch() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(5),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Location used when no real fix is available
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for DefaultLocation {
    fn default() -> Self {
        Self {
            name: "Madrid".to_string(),
            latitude: 40.4168,
            longitude: -3.7038,
        }
    }
}

/// The positioning subsystem of the host environment
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Whether the environment has a positioning capability at all
    fn is_supported(&self) -> bool {
        true
    }

    async fn permission_state(&self) -> PermissionState;

    async fn request_position(&self, options: &PositionOptions) -> Result<Position>;

    /// Start continuous tracking. The subsystem stops tracking when the stream is dropped.
    async fn watch_position(&self, _options: &PositionOptions) -> Result<PositionStream> {
        Err(NeedCoffeeError::UnsupportedEnvironment)
    }
}

pub type PositionStream = BoxStream<'static, Result<Position>>;

/// An active position watch; yields validated fixes until cleared or dropped
pub struct PositionWatch {
    updates: PositionStream,
}

impl PositionWatch {
    /// Stop tracking
    pub fn clear(self) {
        debug!("Position watch cleared");
    }
}

impl Stream for PositionWatch {
    type Item = Result<Position>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.updates.poll_next_unpin(cx)
    }
}

/// Service for resolving the user's current location
pub struct LocationResolver {
    provider: Arc<dyn PositionProvider>,
    cache: Arc<LocationCache>,
    options: PositionOptions,
    default_location: DefaultLocation,
}

impl LocationResolver {
    #[must_use]
    pub fn new(provider: Arc<dyn PositionProvider>, cache: Arc<LocationCache>) -> Self {
        Self {
            provider,
            cache,
            options: PositionOptions::default(),
            default_location: DefaultLocation::default(),
        }
    }

    /// Resolver with cache TTL, live request options and default location taken from `config`
    #[must_use]
    pub fn from_config(provider: Arc<dyn PositionProvider>, config: &LocationConfig) -> Self {
        let cache = Arc::new(LocationCache::new(config.cache_ttl()));
        Self::new(provider, cache)
            .with_options(config.position_options())
            .with_default_location(config.default_location())
    }

    #[must_use]
    pub fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_default_location(mut self, default_location: DefaultLocation) -> Self {
        self.default_location = default_location;
        self
    }

    #[must_use]
    pub fn default_location(&self) -> &DefaultLocation {
        &self.default_location
    }

    /// Resolve the current location, falling back to the default on any positioning error
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> ResolvedLocation {
        match self.current_position(true).await {
            Ok(position) => {
                debug!(
                    "Resolved location at ({:.4}, {:.4})",
                    position.latitude, position.longitude
                );
                ResolvedLocation::fix(position)
            }
            Err(e) => {
                warn!(error = %e, "Location resolution failed, using default location");
                self.fallback(&e)
            }
        }
    }

    /// Resolve the current position without the fallback, surfacing positioning errors
    pub async fn current_position(&self, use_cache: bool) -> Result<Position> {
        self.ensure_supported()?;
        self.ensure_permitted().await?;

        if use_cache && let Some(position) = self.cache.get() {
            debug!("Using cached position");
            return Ok(position);
        }

        self.request_live().await
    }

    /// Track the position continuously. Fixes with non-finite coordinates come
    /// through as `PositionUnavailable` errors; the cache is left untouched.
    pub async fn watch_position(&self, options: PositionOptions) -> Result<PositionWatch> {
        self.ensure_supported()?;
        let updates = self.provider.watch_position(&options).await?;
        info!(high_accuracy = options.high_accuracy, "Started position watch");

        let updates = updates
            .map(|update| match update {
                Ok(position) if !position.is_valid() => Err(NeedCoffeeError::position_unavailable(
                    "positioning subsystem returned non-finite coordinates",
                )),
                other => other,
            })
            .boxed();
        Ok(PositionWatch { updates })
    }

    /// Last cached fix, if still fresh
    #[must_use]
    pub fn cached_position(&self) -> Option<Position> {
        self.cache.get()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn ensure_supported(&self) -> Result<()> {
        if self.provider.is_supported() {
            Ok(())
        } else {
            Err(NeedCoffeeError::UnsupportedEnvironment)
        }
    }

    async fn ensure_permitted(&self) -> Result<()> {
        let state = self.provider.permission_state().await;
        debug!(?state, "Positioning permission state");
        match state {
            PermissionState::Denied => Err(NeedCoffeeError::PermissionDenied),
            PermissionState::Granted | PermissionState::Prompt | PermissionState::Unknown => Ok(()),
        }
    }

    /// A request still running when the timeout fires is dropped; its result is never seen.
    async fn request_live(&self) -> Result<Position> {
        let timeout = self.options.timeout;
        let position = tokio::time::timeout(timeout, self.provider.request_position(&self.options))
            .await
            .map_err(|_| NeedCoffeeError::Timeout { after: timeout })??;

        if !position.is_valid() {
            return Err(NeedCoffeeError::position_unavailable(
                "positioning subsystem returned non-finite coordinates",
            ));
        }

        info!(
            accuracy = ?position.accuracy,
            "Obtained live position fix"
        );
        self.cache.store(position.clone());
        Ok(position)
    }

    fn fallback(&self, error: &NeedCoffeeError) -> ResolvedLocation {
        let name = &self.default_location.name;
        let message = match error {
            NeedCoffeeError::PermissionDenied => format!(
                "Using default location ({name}). To use your location, allow access in browser settings."
            ),
            other => format!(
                "Could not obtain your location: {} Using {name} as fallback.",
                other.user_message()
            ),
        };
        let position = Position::new(
            self.default_location.latitude,
            self.default_location.longitude,
        );
        ResolvedLocation::fallback(position, message)
    }
}

/// How to re-enable location access, tailored to the browser in `user_agent`
#[must_use]
pub fn permission_instructions(user_agent: &str) -> &'static str {
    // Edge and Chrome user agents also contain "Safari"; Edge also contains "Chrome"
    if user_agent.contains("Edg") {
        "In Edge: Click on the 🔒 icon in the address bar → Permissions → Location → Allow"
    } else if user_agent.contains("Chrome") {
        "In Chrome: Click on the 🔒 or 🌐 icon in the address bar → Site settings → Location → Allow"
    } else if user_agent.contains("Firefox") {
        "In Firefox: Click on the 🛡️ icon in the address bar → Permissions → Location → Allow"
    } else if user_agent.contains("Safari") {
        "In Safari: Safari → Preferences → Websites → Location → Allow for this site"
    } else {
        "Look for the location icon in the address bar and select \"Allow\" for this site."
    }
}
