//! Places module
//!
//! This module provides the coffee-place search functionality:
//! - The places search subsystem seam (`PlacesSearch`)
//! - Criteria validation, distance enrichment and ranking of results
//! - A Google Places web service adapter

pub mod google;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::Result;
use crate::models::{CoffeePlace, PlaceDetails, PlaceRecord};
use crate::ranking;
use crate::search_criteria::{NearbySearchRequest, SearchCriteria};

pub use google::GooglePlacesClient;

/// The third-party places search subsystem
#[async_trait]
pub trait PlacesSearch: Send + Sync {
    async fn nearby_search(&self, request: &NearbySearchRequest) -> Result<Vec<PlaceRecord>>;

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails>;
}

/// Runs coffee-place searches against a places subsystem
pub struct PlacesService {
    search: Arc<dyn PlacesSearch>,
}

impl PlacesService {
    #[must_use]
    pub fn new(search: Arc<dyn PlacesSearch>) -> Self {
        Self { search }
    }

    /// Search around the criteria origin and return places ranked by the criteria sort key.
    ///
    /// Invalid criteria are refused before the subsystem is called.
    #[instrument(skip(self, criteria), fields(radius = criteria.radius(), sort_by = %criteria.sort_by()))]
    pub async fn search_coffee_places(&self, criteria: &SearchCriteria) -> Result<Vec<CoffeePlace>> {
        let request = criteria.to_places_request()?;
        let records = self.search.nearby_search(&request).await?;
        debug!("Places subsystem returned {} results", records.len());

        let places = records
            .into_iter()
            .map(|record| CoffeePlace::from_record(record, criteria.origin()))
            .collect();
        Ok(ranking::ranked(places, criteria.sort_by()))
    }

    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails> {
        self.search.place_details(place_id).await
    }
}
