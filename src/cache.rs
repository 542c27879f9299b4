use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::Position;

/// Default lifetime of a cached position
pub const DEFAULT_TTL: TimeDelta = TimeDelta::minutes(5);

/// Source of the current instant, injectable so expiry can be tested deterministically
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
struct CachedPosition {
    position: Position,
    stored_at: DateTime<Utc>,
}

/// Holds the last resolved position for a bounded time.
///
/// A single mutex serializes `store`, `get` and `clear`, so a read can never
/// observe a half-replaced entry.
pub struct LocationCache {
    entry: Mutex<Option<CachedPosition>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl LocationCache {
    /// Cache with the given TTL on the system clock
    #[must_use]
    pub fn new(ttl: TimeDelta) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Cache with the given TTL on an injected clock
    #[must_use]
    pub fn with_clock(ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            entry: Mutex::new(None),
            ttl,
            clock,
        }
    }

    /// How long an entry stays valid after it is stored
    #[must_use]
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Records `position` as of now, replacing any previous entry.
    #[tracing::instrument(name = "store_position", level = "debug", skip(self))]
    pub fn store(&self, position: Position) {
        let stored_at = self.clock.now();
        *self.lock() = Some(CachedPosition {
            position,
            stored_at,
        });
    }

    /// Returns the stored position while it is younger than the TTL.
    /// Returns `None` for an empty cache or an expired entry.
    pub fn get(&self) -> Option<Position> {
        let now = self.clock.now();
        let guard = self.lock();
        match guard.as_ref() {
            Some(cached) if now - cached.stored_at < self.ttl => {
                tracing::debug!("Cached position found and still fresh");
                Some(cached.position.clone())
            }
            Some(_) => {
                tracing::debug!("Cached position found but expired");
                None
            }
            None => {
                tracing::debug!("No cached position");
                None
            }
        }
    }

    /// Whether [`get`](Self::get) would currently return a position.
    pub fn has_valid_entry(&self) -> bool {
        self.get().is_some()
    }

    /// Discards any stored entry.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<CachedPosition>> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LocationCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
