//! End-to-end tests of the location and search pipeline with in-memory doubles:
//! resolve a location, build criteria from form parameters, search and rank.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use need_coffee::search_criteria::NearbySearchRequest;
use need_coffee::{
    Clock, LocationCache, LocationResolver, NeedCoffeeError, PermissionState, PlaceDetails,
    PlaceRecord, PlacesSearch, PlacesService, Position, PositionOptions, PositionProvider,
    SearchCriteria, SearchParams,
};

struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    fn advance(&self, delta: TimeDelta) {
        *self.0.lock().unwrap() += delta;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

struct CountingProvider {
    permission: PermissionState,
    fix: Option<(f64, f64)>,
    calls: AtomicUsize,
}

#[async_trait]
impl PositionProvider for CountingProvider {
    async fn permission_state(&self) -> PermissionState {
        self.permission
    }

    async fn request_position(&self, _options: &PositionOptions) -> need_coffee::Result<Position> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fix {
            Some((lat, lng)) => Ok(Position::with_accuracy(lat, lng, Some(12.0), Utc::now())),
            None => Err(NeedCoffeeError::Timeout {
                after: std::time::Duration::from_secs(10),
            }),
        }
    }
}

#[derive(Default)]
struct FakePlaces {
    calls: AtomicUsize,
}

#[async_trait]
impl PlacesSearch for FakePlaces {
    async fn nearby_search(
        &self,
        request: &NearbySearchRequest,
    ) -> need_coffee::Result<Vec<PlaceRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Three cafés due north of the request origin, plus one without coordinates
        let north = |id: &str, km: f64, rating: Option<f64>| PlaceRecord {
            place_id: id.to_string(),
            name: Some(id.to_string()),
            latitude: request.latitude + km / 111.19,
            longitude: request.longitude,
            rating,
            ..PlaceRecord::default()
        };
        Ok(vec![
            PlaceRecord {
                place_id: "nowhere".to_string(),
                latitude: f64::NAN,
                longitude: f64::NAN,
                ..PlaceRecord::default()
            },
            north("three-a", 3.0, Some(4.0)),
            north("one", 1.0, None),
            north("three-b", 3.0, Some(4.9)),
        ])
    }

    async fn place_details(&self, place_id: &str) -> need_coffee::Result<PlaceDetails> {
        Err(NeedCoffeeError::search_api(format!("no details for {place_id}")))
    }
}

fn pipeline(
    permission: PermissionState,
    fix: Option<(f64, f64)>,
) -> (LocationResolver, Arc<CountingProvider>, Arc<TestClock>) {
    let provider = Arc::new(CountingProvider {
        permission,
        fix,
        calls: AtomicUsize::new(0),
    });
    let clock = Arc::new(TestClock(Mutex::new(Utc::now())));
    let cache = Arc::new(LocationCache::with_clock(TimeDelta::minutes(5), clock.clone()));
    (LocationResolver::new(provider.clone(), cache), provider, clock)
}

#[tokio::test]
async fn resolved_fix_feeds_a_ranked_search() {
    let (resolver, provider, _clock) = pipeline(PermissionState::Granted, Some((52.52, 13.405)));
    let places = Arc::new(FakePlaces::default());
    let service = PlacesService::new(places.clone());

    let resolved = resolver.resolve().await;
    assert!(!resolved.is_default);
    assert_eq!(resolved.status_message().as_deref(), Some("Location: 12m"));

    let criteria = SearchCriteria::from_params(
        Some(resolved.position),
        &SearchParams {
            radius: Some(50.0),
            ..SearchParams::default()
        },
    );
    assert_eq!(criteria.radius(), 200.0);

    let found = service.search_coffee_places(&criteria).await.unwrap();
    let ids: Vec<&str> = found.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(ids, ["one", "three-a", "three-b", "nowhere"]);
    assert_eq!(found[0].formatted_distance(), "1.0 km");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(places.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cached_fix_is_reused_until_it_expires() {
    let (resolver, provider, clock) = pipeline(PermissionState::Prompt, Some((52.52, 13.405)));

    resolver.resolve().await;
    clock.advance(TimeDelta::minutes(4));
    resolver.resolve().await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    clock.advance(TimeDelta::minutes(2));
    resolver.resolve().await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn denied_permission_searches_around_the_default_location() {
    let (resolver, provider, _clock) = pipeline(PermissionState::Denied, Some((52.52, 13.405)));
    let service = PlacesService::new(Arc::new(FakePlaces::default()));

    let resolved = resolver.resolve().await;
    assert!(resolved.is_default);
    assert!(!resolved.message.as_deref().unwrap_or_default().is_empty());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

    let criteria = SearchCriteria::new(Some(resolved.position), 1500.0);
    let found = service.search_coffee_places(&criteria).await.unwrap();
    assert_eq!(found.len(), 4);
}

#[tokio::test]
async fn failed_fix_falls_back_and_is_not_cached() {
    let (resolver, provider, _clock) = pipeline(PermissionState::Granted, None);

    let first = resolver.resolve().await;
    let second = resolver.resolve().await;

    assert!(first.is_default && second.is_default);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    assert!(resolver.cached_position().is_none());
}

#[tokio::test]
async fn missing_origin_never_reaches_places() {
    let places = Arc::new(FakePlaces::default());
    let service = PlacesService::new(places.clone());

    let err = service
        .search_coffee_places(&SearchCriteria::from_params(None, &SearchParams::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, NeedCoffeeError::InvalidCriteria { .. }));
    assert_eq!(places.calls.load(Ordering::SeqCst), 0);
}
