//! Ordering of search results

use std::cmp::Ordering;

use feruca::Collator;

use crate::models::CoffeePlace;
use crate::search_criteria::SortKey;

/// Sort `places` in place by `sort_by`. Stable: ties keep their input order.
pub fn rank_places(places: &mut [CoffeePlace], sort_by: SortKey) {
    match sort_by {
        SortKey::Distance => places.sort_by(compare_distance),
        SortKey::Rating => places.sort_by(compare_rating),
        SortKey::Name => {
            let mut collator = Collator::default();
            places.sort_by(|a, b| compare_name(&mut collator, a, b));
        }
    }
}

/// Owned variant of [`rank_places`]
#[must_use]
pub fn ranked(mut places: Vec<CoffeePlace>, sort_by: SortKey) -> Vec<CoffeePlace> {
    rank_places(&mut places, sort_by);
    places
}

/// Ascending; unknown distances are treated as infinitely far
fn compare_distance(a: &CoffeePlace, b: &CoffeePlace) -> Ordering {
    let a = a.distance_km.unwrap_or(f64::INFINITY);
    let b = b.distance_km.unwrap_or(f64::INFINITY);
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Descending; unrated places count as 0
fn compare_rating(a: &CoffeePlace, b: &CoffeePlace) -> Ordering {
    let a = a.rating.unwrap_or(0.0);
    let b = b.rating.unwrap_or(0.0);
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Ascending by Unicode collation (CLDR root order), raw code points as tiebreak
fn compare_name(collator: &mut Collator, a: &CoffeePlace, b: &CoffeePlace) -> Ordering {
    let a = a.name.as_deref().unwrap_or_default();
    let b = b.name.as_deref().unwrap_or_default();
    collator.collate(a, b).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlaceRecord;

    fn place(id: &str, name: Option<&str>, distance: Option<f64>, rating: Option<f64>) -> CoffeePlace {
        let mut place = CoffeePlace::from_record(
            PlaceRecord {
                place_id: id.to_string(),
                name: name.map(str::to_string),
                rating,
                ..PlaceRecord::default()
            },
            None,
        );
        place.distance_km = distance;
        place
    }

    fn ids(places: &[CoffeePlace]) -> Vec<&str> {
        places.iter().map(|p| p.place_id.as_str()).collect()
    }

    #[test]
    fn test_distance_sort_is_stable_and_puts_unknown_last() {
        let places = vec![
            place("none", None, None, None),
            place("three-a", None, Some(3.0), None),
            place("one", None, Some(1.0), None),
            place("three-b", None, Some(3.0), None),
        ];
        let sorted = ranked(places, SortKey::Distance);
        assert_eq!(ids(&sorted), ["one", "three-a", "three-b", "none"]);
    }

    #[test]
    fn test_zero_distance_sorts_first() {
        let places = vec![
            place("far", None, Some(2.0), None),
            place("here", None, Some(0.0), None),
        ];
        assert_eq!(ids(&ranked(places, SortKey::Distance)), ["here", "far"]);
    }

    #[test]
    fn test_rating_sort_descending_with_missing_as_zero() {
        let places = vec![
            place("unrated", None, None, None),
            place("good", None, None, Some(4.5)),
            place("ok", None, None, Some(3.9)),
            place("good-too", None, None, Some(4.5)),
        ];
        let sorted = ranked(places, SortKey::Rating);
        assert_eq!(ids(&sorted), ["good", "good-too", "ok", "unrated"]);
    }

    #[test]
    fn test_name_sort_ignores_case_and_handles_missing() {
        let places = vec![
            place("b", Some("bolt coffee"), None, None),
            place("missing", None, None, None),
            place("a", Some("Acme Café"), None, None),
            place("c", Some("Cafelito"), None, None),
        ];
        let sorted = ranked(places, SortKey::Name);
        assert_eq!(ids(&sorted), ["missing", "a", "b", "c"]);
    }

    #[test]
    fn test_name_sort_places_accented_names_with_their_base_letter() {
        let places = vec![
            place("zurich", Some("Zurich Roasters"), None, None),
            place("eclair", Some("Éclair Café"), None, None),
            place("abaco", Some("Ábaco"), None, None),
            place("bolt", Some("bolt coffee"), None, None),
        ];
        let sorted = ranked(places, SortKey::Name);
        assert_eq!(ids(&sorted), ["abaco", "bolt", "eclair", "zurich"]);
    }

    #[test]
    fn test_empty_list() {
        let mut places: Vec<CoffeePlace> = Vec::new();
        rank_places(&mut places, SortKey::Name);
        assert!(places.is_empty());
    }
}
