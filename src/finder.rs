//! Coffee finder
//!
//! One user-initiated search end to end: resolve the location (with
//! fallback), turn form parameters into criteria around it, search the
//! places subsystem and rank the results.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::Result;
use crate::config::{NeedCoffeeConfig, SearchConfig};
use crate::location_resolver::{LocationResolver, PositionProvider};
use crate::models::{CoffeePlace, Position, ResolvedLocation};
use crate::places::{GooglePlacesClient, PlacesService};
use crate::search_criteria::{SearchCriteria, SearchParams};

/// Outcome of one search
#[derive(Debug, Clone, Serialize)]
pub struct CoffeeSearch {
    /// Where the search was centred, and whether that is the fallback location
    pub location: ResolvedLocation,
    pub radius_m: f64,
    pub places: Vec<CoffeePlace>,
}

pub struct CoffeeFinder {
    resolver: LocationResolver,
    places: PlacesService,
    default_radius_m: f64,
}

impl CoffeeFinder {
    #[must_use]
    pub fn new(resolver: LocationResolver, places: PlacesService, search: &SearchConfig) -> Self {
        Self {
            resolver,
            places,
            default_radius_m: search.default_radius_m,
        }
    }

    /// Wire the resolver, the Google Places client and the search defaults from `config`
    pub fn from_config(
        config: &NeedCoffeeConfig,
        provider: Arc<dyn PositionProvider>,
    ) -> Result<Self> {
        let resolver = LocationResolver::from_config(provider, &config.location);
        let client = GooglePlacesClient::from_config(&config.maps)?;
        Ok(Self::new(
            resolver,
            PlacesService::new(Arc::new(client)),
            &config.search,
        ))
    }

    #[must_use]
    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    #[must_use]
    pub fn places(&self) -> &PlacesService {
        &self.places
    }

    /// Criteria around `origin`, starting from the configured default radius
    #[must_use]
    pub fn criteria(&self, origin: Position, params: &SearchParams) -> SearchCriteria {
        SearchCriteria::from_params_with_default(Some(origin), params, self.default_radius_m)
    }

    /// Resolve the location and search around it.
    ///
    /// Positioning problems never fail the search; they show up as a
    /// fallback location. Search errors are returned.
    #[instrument(skip(self, params))]
    pub async fn find(&self, params: &SearchParams) -> Result<CoffeeSearch> {
        let location = self.resolver.resolve().await;
        if location.is_default {
            warn!("Searching around the default location");
        }

        let criteria = self.criteria(location.position.clone(), params);
        let places = self.places.search_coffee_places(&criteria).await?;
        info!(
            "Found {} coffee places within {}m",
            places.len(),
            criteria.radius()
        );

        Ok(CoffeeSearch {
            location,
            radius_m: criteria.radius(),
            places,
        })
    }
}
