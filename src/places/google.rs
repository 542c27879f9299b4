//! Google Places web service client
//!
//! Implements [`PlacesSearch`] over the Nearby Search and Place Details
//! endpoints. Requests are made once; failures are reported, never retried.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use super::PlacesSearch;
use crate::Result;
use crate::config::MapsConfig;
use crate::error::NeedCoffeeError;
use crate::models::{PlaceDetails, PlaceRecord};
use crate::search_criteria::NearbySearchRequest;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

const DETAILS_FIELDS: &str =
    "place_id,name,rating,formatted_phone_number,website,opening_hours,reviews";

/// Google Places API client
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GooglePlacesClient {
    /// Create a new client against `base_url` (no trailing slash required)
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(NeedCoffeeError::config("Google Maps API key is not set"));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("need-coffee/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NeedCoffeeError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &MapsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| NeedCoffeeError::config("Google Maps API key is not set"))?;
        Self::new(
            api_key,
            config.places_base_url.clone(),
            Duration::from_secs(config.timeout_seconds.into()),
        )
    }

    fn nearby_url(&self, request: &NearbySearchRequest) -> String {
        let mut url = format!(
            "{}/nearbysearch/json?location={},{}&radius={}&type={}",
            self.base_url, request.latitude, request.longitude, request.radius, request.place_type
        );
        if let Some(keyword) = &request.keyword {
            url.push_str("&keyword=");
            url.push_str(&urlencoding::encode(keyword));
        }
        if request.open_now {
            url.push_str("&opennow=true");
        }
        url
    }

    fn details_url(&self, place_id: &str) -> String {
        format!(
            "{}/details/json?place_id={}&fields={}",
            self.base_url,
            urlencoding::encode(place_id),
            DETAILS_FIELDS
        )
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        debug!("Google Places request URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(format!("{url}&key={}", urlencoding::encode(&self.api_key)))
            .send()
            .await
            .map_err(|e| {
                error!("Places request failed: {}", e);
                if e.is_timeout() {
                    NeedCoffeeError::search_api("request timed out")
                } else {
                    NeedCoffeeError::search_api(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NeedCoffeeError::search_api(format!("HTTP {status}")));
        }

        let body = response.json::<T>().await.map_err(|e| {
            error!("Failed to parse Places response: {}", e);
            NeedCoffeeError::search_api("invalid response from Places API")
        })?;

        let elapsed = start_time.elapsed();
        if elapsed.as_secs() > 5 {
            warn!("Slow Places API response detected: {:.3}s", elapsed.as_secs_f64());
        }
        Ok(body)
    }
}

#[async_trait]
impl PlacesSearch for GooglePlacesClient {
    #[instrument(skip(self, request), fields(radius = request.radius))]
    async fn nearby_search(&self, request: &NearbySearchRequest) -> Result<Vec<PlaceRecord>> {
        let response: NearbySearchResponse = self.get_json(&self.nearby_url(request)).await?;

        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Ok(Vec::new()),
            status => return Err(api_status_error(status, response.error_message)),
        }

        let places: Vec<PlaceRecord> = response
            .results
            .into_iter()
            .map(PlaceRecord::from)
            .collect();
        info!("Found {} places", places.len());
        Ok(places)
    }

    #[instrument(skip(self))]
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails> {
        let response: DetailsResponse = self.get_json(&self.details_url(place_id)).await?;

        if response.status != "OK" {
            return Err(api_status_error(&response.status, response.error_message));
        }
        response
            .result
            .map(|result| result.into_details(place_id))
            .ok_or_else(|| NeedCoffeeError::search_api("details response has no result"))
    }
}

fn api_status_error(status: &str, detail: Option<String>) -> NeedCoffeeError {
    match detail {
        Some(detail) => NeedCoffeeError::search_api(format!("Error in Places API: {status} ({detail})")),
        None => NeedCoffeeError::search_api(format!("Error in Places API: {status}")),
    }
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    #[serde(default)]
    results: Vec<ApiPlace>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPlace {
    place_id: String,
    name: Option<String>,
    geometry: ApiGeometry,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    vicinity: Option<String>,
    formatted_address: Option<String>,
    opening_hours: Option<ApiOpeningHours>,
    price_level: Option<u8>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    photos: Vec<ApiPhoto>,
}

#[derive(Debug, Deserialize)]
struct ApiGeometry {
    location: ApiLatLng,
}

#[derive(Debug, Deserialize)]
struct ApiLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct ApiOpeningHours {
    open_now: Option<bool>,
    #[serde(default)]
    weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPhoto {
    photo_reference: String,
}

impl From<ApiPlace> for PlaceRecord {
    fn from(place: ApiPlace) -> Self {
        Self {
            place_id: place.place_id,
            name: place.name,
            latitude: place.geometry.location.lat,
            longitude: place.geometry.location.lng,
            rating: place.rating,
            user_ratings_total: place.user_ratings_total,
            vicinity: place
                .vicinity
                .or(place.formatted_address)
                .unwrap_or_default(),
            open_now: place.opening_hours.and_then(|hours| hours.open_now),
            price_level: place.price_level,
            types: place.types,
            photo_references: place
                .photos
                .into_iter()
                .map(|photo| photo.photo_reference)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    result: Option<ApiDetails>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiDetails {
    place_id: Option<String>,
    name: Option<String>,
    rating: Option<f64>,
    formatted_phone_number: Option<String>,
    website: Option<String>,
    opening_hours: Option<ApiOpeningHours>,
    #[serde(default)]
    reviews: Vec<serde_json::Value>,
}

impl ApiDetails {
    fn into_details(self, requested_id: &str) -> PlaceDetails {
        let (open_now, weekday_text) = match self.opening_hours {
            Some(hours) => (hours.open_now, hours.weekday_text),
            None => (None, Vec::new()),
        };
        PlaceDetails {
            place_id: self.place_id.unwrap_or_else(|| requested_id.to_string()),
            name: self.name,
            rating: self.rating,
            formatted_phone_number: self.formatted_phone_number,
            website: self.website,
            open_now,
            weekday_text,
            review_count: self.reviews.len(),
        }
    }
}
