//! Place models: raw records from the places subsystem and enriched coffee places

use serde::{Deserialize, Serialize};

use crate::geo;
use crate::models::Position;

/// Ratings at or above this value count as "good"
pub const GOOD_RATING_THRESHOLD: f64 = 4.0;

const MAPS_DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/?api=1";
const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1";
const PLACE_PHOTO_URL: &str = "https://maps.googleapis.com/maps/api/place/photo";

/// Default bounds for [`CoffeePlace::photo_url`]
pub const DEFAULT_PHOTO_MAX_WIDTH: u32 = 400;
pub const DEFAULT_PHOTO_MAX_HEIGHT: u32 = 300;

/// A place as returned by the places search subsystem
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PlaceRecord {
    pub place_id: String,
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    /// Short address or neighbourhood
    pub vicinity: String,
    pub open_now: Option<bool>,
    pub price_level: Option<u8>,
    pub types: Vec<String>,
    pub photo_references: Vec<String>,
}

/// Extra information returned by a place details lookup
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    pub open_now: Option<bool>,
    /// One human-readable line per weekday
    pub weekday_text: Vec<String>,
    pub review_count: usize,
}

/// A coffee place found by a search, with its distance from the search origin
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CoffeePlace {
    pub place_id: String,
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub vicinity: String,
    pub open_now: Option<bool>,
    pub price_level: Option<u8>,
    pub types: Vec<String>,
    pub photo_references: Vec<String>,
    /// Distance from the search origin, computed at discovery time
    pub distance_km: Option<f64>,
}

impl CoffeePlace {
    /// Build from a raw record, computing the distance from `origin` when given
    #[must_use]
    pub fn from_record(record: PlaceRecord, origin: Option<&Position>) -> Self {
        let distance_km = origin
            .filter(|origin| origin.is_valid())
            .filter(|_| geo::is_valid_coordinate(record.latitude, record.longitude))
            .map(|origin| origin.distance_km_to(record.latitude, record.longitude));

        Self {
            place_id: record.place_id,
            name: record.name,
            latitude: record.latitude,
            longitude: record.longitude,
            rating: record.rating,
            user_ratings_total: record.user_ratings_total,
            vicinity: record.vicinity,
            open_now: record.open_now,
            price_level: record.price_level,
            types: record.types,
            photo_references: record.photo_references,
            distance_km,
        }
    }

    #[must_use]
    pub fn has_good_rating(&self) -> bool {
        self.rating.unwrap_or(0.0) >= GOOD_RATING_THRESHOLD
    }

    #[must_use]
    pub fn is_open_now(&self) -> bool {
        self.open_now.unwrap_or(false)
    }

    #[must_use]
    pub fn open_status_text(&self) -> &'static str {
        match self.open_now {
            None => "Opening hours not available",
            Some(true) => "Currently open",
            Some(false) => "Closed",
        }
    }

    /// Google Maps directions link, by place id when known, else by address
    #[must_use]
    pub fn directions_url(&self) -> String {
        if self.place_id.is_empty() {
            format!(
                "{MAPS_DIRECTIONS_URL}&destination={}",
                urlencoding::encode(&self.vicinity)
            )
        } else {
            format!(
                "{MAPS_DIRECTIONS_URL}&destination_place_id={}",
                urlencoding::encode(&self.place_id)
            )
        }
    }

    #[must_use]
    pub fn google_maps_url(&self) -> String {
        format!(
            "{MAPS_SEARCH_URL}&query_place_id={}",
            urlencoding::encode(&self.place_id)
        )
    }

    /// Photo link for the first photo reference, `None` when the place has no photos
    #[must_use]
    pub fn photo_url(&self, api_key: &str, max_width: u32, max_height: u32) -> Option<String> {
        let reference = self.photo_references.first()?;
        Some(format!(
            "{PLACE_PHOTO_URL}?maxwidth={max_width}&maxheight={max_height}&photo_reference={}&key={}",
            urlencoding::encode(reference),
            urlencoding::encode(api_key)
        ))
    }

    #[must_use]
    pub fn formatted_rating(&self) -> String {
        geo::format_rating(self.rating, self.user_ratings_total)
    }

    /// Empty when the distance is unknown
    #[must_use]
    pub fn formatted_distance(&self) -> String {
        self.distance_km.map(geo::format_distance).unwrap_or_default()
    }
}
