//! Search criteria normalization
//!
//! Turns raw user input (radius, keyword, sort order, open-now flag) into a
//! criteria object that is safe to hand to the places search subsystem.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::NeedCoffeeError;
use crate::models::Position;

pub const MIN_RADIUS_M: f64 = 200.0;
pub const MAX_RADIUS_M: f64 = 5000.0;
pub const DEFAULT_RADIUS_M: f64 = 1500.0;

/// The only place category this application searches for
pub const PLACE_TYPE: &str = "cafe";

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Distance,
    Rating,
    Name,
}

impl SortKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Distance => "distance",
            SortKey::Rating => "rating",
            SortKey::Name => "name",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = NeedCoffeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distance" => Ok(SortKey::Distance),
            "rating" => Ok(SortKey::Rating),
            "name" => Ok(SortKey::Name),
            other => Err(NeedCoffeeError::invalid_criteria(format!(
                "unknown sort key '{other}', expected one of: distance, rating, name"
            ))),
        }
    }
}

/// Raw parameters from the search form; absent fields leave the criteria unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub radius: Option<f64>,
    pub keyword: Option<String>,
    pub sort_by: Option<String>,
    pub open_now: Option<bool>,
}

/// Request shape sent to the places search subsystem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbySearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub place_type: &'static str,
    pub keyword: Option<String>,
    pub open_now: bool,
}

/// Criteria for one user-initiated search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    origin: Option<Position>,
    radius: f64,
    keyword: String,
    sort_by: SortKey,
    open_now: bool,
}

impl SearchCriteria {
    /// Criteria around `origin`. The initial radius is stored as given; every
    /// later change through [`set_radius`](Self::set_radius) is clamped.
    #[must_use]
    pub fn new(origin: Option<Position>, radius: f64) -> Self {
        Self {
            origin,
            radius,
            keyword: String::new(),
            sort_by: SortKey::default(),
            open_now: false,
        }
    }

    /// Criteria around `origin` with `params` applied on top of [`DEFAULT_RADIUS_M`]
    #[must_use]
    pub fn from_params(origin: Option<Position>, params: &SearchParams) -> Self {
        Self::from_params_with_default(origin, params, DEFAULT_RADIUS_M)
    }

    /// Criteria around `origin` with `params` applied on top of `default_radius`.
    /// The default is clamped like any user-chosen radius.
    #[must_use]
    pub fn from_params_with_default(
        origin: Option<Position>,
        params: &SearchParams,
        default_radius: f64,
    ) -> Self {
        let mut criteria = Self::new(origin, DEFAULT_RADIUS_M);
        criteria.set_radius(default_radius);
        criteria.update_parameters(params);
        criteria
    }

    pub fn set_origin(&mut self, origin: Position) {
        self.origin = Some(origin);
    }

    /// Clamp to [`MIN_RADIUS_M`], [`MAX_RADIUS_M`]
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.clamp(MIN_RADIUS_M, MAX_RADIUS_M);
    }

    pub fn set_keyword(&mut self, keyword: Option<&str>) {
        self.keyword = keyword.map(str::trim).unwrap_or_default().to_string();
    }

    /// Unrecognized keys keep the current ordering
    pub fn set_sort_by(&mut self, sort_by: &str) {
        match sort_by.parse() {
            Ok(key) => self.sort_by = key,
            Err(_) => warn!(
                sort_by,
                current = %self.sort_by,
                "Ignoring unknown sort key"
            ),
        }
    }

    pub fn set_open_now(&mut self, open_now: bool) {
        self.open_now = open_now;
    }

    pub fn update_parameters(&mut self, params: &SearchParams) {
        if let Some(radius) = params.radius {
            self.set_radius(radius);
        }
        if let Some(keyword) = &params.keyword {
            self.set_keyword(Some(keyword));
        }
        if let Some(sort_by) = &params.sort_by {
            self.set_sort_by(sort_by);
        }
        if let Some(open_now) = params.open_now {
            self.set_open_now(open_now);
        }
    }

    #[must_use]
    pub fn origin(&self) -> Option<&Position> {
        self.origin.as_ref()
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    #[must_use]
    pub fn sort_by(&self) -> SortKey {
        self.sort_by
    }

    #[must_use]
    pub fn open_now(&self) -> bool {
        self.open_now
    }

    /// Usable for a search: finite origin and strictly positive radius
    pub fn validate(&self) -> Result<(), NeedCoffeeError> {
        let Some(origin) = &self.origin else {
            return Err(NeedCoffeeError::invalid_criteria("search origin is not set"));
        };
        if !origin.is_valid() {
            return Err(NeedCoffeeError::invalid_criteria(format!(
                "search origin has non-finite coordinates ({}, {})",
                origin.latitude, origin.longitude
            )));
        }
        // NaN fails this comparison too
        if !(self.radius > 0.0) {
            return Err(NeedCoffeeError::invalid_criteria(format!(
                "search radius must be positive, got {}",
                self.radius
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Build the subsystem request, refusing invalid criteria
    pub fn to_places_request(&self) -> Result<NearbySearchRequest, NeedCoffeeError> {
        self.validate()?;
        let origin = self
            .origin
            .as_ref()
            .ok_or_else(|| NeedCoffeeError::invalid_criteria("search origin is not set"))?;

        Ok(NearbySearchRequest {
            latitude: origin.latitude,
            longitude: origin.longitude,
            radius: self.radius,
            place_type: PLACE_TYPE,
            keyword: (!self.keyword.is_empty()).then(|| self.keyword.clone()),
            open_now: self.open_now,
        })
    }
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self::new(None, DEFAULT_RADIUS_M)
    }
}
