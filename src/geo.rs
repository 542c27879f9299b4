//! Great-circle distance and display formatting helpers.

use haversine::{Location as HaversineLocation, Units, distance};

/// Mean Earth radius used by the haversine formula, in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers
#[must_use]
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let from = HaversineLocation {
        latitude: lat1,
        longitude: lng1,
    };
    let to = HaversineLocation {
        latitude: lat2,
        longitude: lng2,
    };
    distance(from, to, Units::Kilometers)
}

/// Format a distance for display: meters below 1 km, otherwise one-decimal kilometers
#[must_use]
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{} m", (km * 1000.0).round())
    } else {
        format!("{km:.1} km")
    }
}

/// Format a rating with its optional review count, e.g. `4.5 (120 reviews)`
#[must_use]
pub fn format_rating(rating: Option<f64>, reviews: Option<u32>) -> String {
    match rating {
        Some(rating) if rating > 0.0 => match reviews {
            Some(count) if count > 0 => format!("{rating:.1} ({count} reviews)"),
            _ => format!("{rating:.1}"),
        },
        _ => "No rating".to_string(),
    }
}

/// Both coordinates are finite numbers
#[must_use]
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite() && longitude.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(40.4168, -3.7038)]
    #[case(0.0, 0.0)]
    #[case(-33.8688, 151.2093)]
    #[case(89.9, 179.9)]
    fn test_distance_to_self_is_zero(#[case] lat: f64, #[case] lng: f64) {
        assert_eq!(distance_km(lat, lng, lat, lng), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = (40.4168, -3.7038);
        let b = (41.3874, 2.1686);
        let ab = distance_km(a.0, a.1, b.0, b.1);
        let ba = distance_km(b.0, b.1, a.0, a.1);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_distance_madrid_barcelona() {
        let d = distance_km(40.4168, -3.7038, 41.3874, 2.1686);
        assert!((d - 505.0).abs() < 5.0, "unexpected distance {d}");
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance_km(0.0, 0.0, 1.0, 0.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!((d - expected).abs() < 1e-6);
    }

    #[rstest]
    #[case(0.5, "500 m")]
    #[case(2.345, "2.3 km")]
    #[case(0.0, "0 m")]
    #[case(0.9996, "1000 m")]
    #[case(1.0, "1.0 km")]
    #[case(12.0, "12.0 km")]
    fn test_format_distance(#[case] km: f64, #[case] expected: &str) {
        assert_eq!(format_distance(km), expected);
    }

    #[rstest]
    #[case(Some(4.46), Some(120), "4.5 (120 reviews)")]
    #[case(Some(3.0), None, "3.0")]
    #[case(Some(3.0), Some(0), "3.0")]
    #[case(None, Some(10), "No rating")]
    #[case(Some(0.0), None, "No rating")]
    fn test_format_rating(
        #[case] rating: Option<f64>,
        #[case] reviews: Option<u32>,
        #[case] expected: &str,
    ) {
        assert_eq!(format_rating(rating, reviews), expected);
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(is_valid_coordinate(40.0, -3.0));
        assert!(!is_valid_coordinate(f64::NAN, -3.0));
        assert!(!is_valid_coordinate(40.0, f64::INFINITY));
    }
}
