//! Aggregator behavior against in-process fake providers.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use hangry_aggregator::{
    AggregateError, Aggregator, AggregatorConfig, IdentityMatcher, ListingSource,
    ReputationSource, RequestPhase,
};
use hangry_core::{
    ListingRecord, Provider, ProviderError, ReputationRecord, ReputationStatus, ReviewSnippet,
};

fn listing(id: &str, name: &str, cuisines: &[&str]) -> ListingRecord {
    ListingRecord {
        provider_id: id.to_owned(),
        name: name.to_owned(),
        street_address: None,
        city: Some("San Francisco".to_owned()),
        state: Some("CA".to_owned()),
        zip: None,
        is_open: true,
        order_url: Some(format!("https://order.example.com/{id}")),
        logo_url: None,
        cuisines: cuisines.iter().map(|c| (*c).to_owned()).collect::<BTreeSet<_>>(),
        menu: Vec::new(),
    }
}

fn reputation(id: &str, name: &str, rating: f64) -> ReputationRecord {
    ReputationRecord {
        external_id: id.to_owned(),
        name: name.to_owned(),
        city: Some("San Francisco".to_owned()),
        rating,
        review_count: 100,
        url: None,
        reviews: Vec::new(),
        photos: Vec::new(),
    }
}

/// Listing fake: fixed search results, or a fixed failure status.
struct FakeListing {
    results: Result<Vec<ListingRecord>, u16>,
    searches: AtomicUsize,
}

impl FakeListing {
    fn ok(results: Vec<ListingRecord>) -> Self {
        Self {
            results: Ok(results),
            searches: AtomicUsize::new(0),
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            results: Err(status),
            searches: AtomicUsize::new(0),
        }
    }
}

impl ListingSource for FakeListing {
    async fn search(
        &self,
        _term: Option<&str>,
        _address: &str,
    ) -> Result<Vec<ListingRecord>, ProviderError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.results.clone().map_err(|status| {
            ProviderError::from_status(Provider::Listing, status, Some(42), "/restaurant/search")
        })
    }

    async fn get_detail(&self, provider_id: &str) -> Result<ListingRecord, ProviderError> {
        let results = self.results.as_ref().map_err(|status| {
            ProviderError::from_status(Provider::Listing, *status, None, "/restaurant")
        })?;
        let mut record = results
            .iter()
            .find(|r| r.provider_id == provider_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                provider: Provider::Listing,
                resource: provider_id.to_owned(),
            })?;
        record.menu = vec![hangry_core::MenuItem {
            name: "Khao Soi".to_owned(),
            description: None,
            price: rust_decimal::Decimal::new(1895, 2),
            category: "Noodles".to_owned(),
        }];
        Ok(record)
    }
}

/// What the reputation fake does for one restaurant name.
#[derive(Clone)]
enum Behavior {
    Match { rating: f64, delay_ms: u64 },
    NoMatch,
    Hang,
    Fail(u16),
}

struct FakeReputation {
    by_name: HashMap<String, Behavior>,
    detail_fails: bool,
}

impl FakeReputation {
    fn new(entries: &[(&str, Behavior)]) -> Self {
        Self {
            by_name: entries
                .iter()
                .map(|(name, b)| ((*name).to_owned(), b.clone()))
                .collect(),
            detail_fails: false,
        }
    }
}

impl ReputationSource for FakeReputation {
    async fn search(
        &self,
        term: &str,
        _location: &str,
        _limit: u32,
    ) -> Result<Vec<ReputationRecord>, ProviderError> {
        match self.by_name.get(term).cloned().unwrap_or(Behavior::NoMatch) {
            Behavior::Match { rating, delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(vec![reputation(&term.to_lowercase(), term, rating)])
            }
            Behavior::NoMatch => Ok(Vec::new()),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3_600)).await;
                Ok(Vec::new())
            }
            Behavior::Fail(status) => Err(ProviderError::from_status(
                Provider::Reputation,
                status,
                None,
                "/v3/businesses/search",
            )),
        }
    }

    async fn get_detail(&self, record: &ReputationRecord) -> Result<ReputationRecord, ProviderError> {
        if self.detail_fails {
            return Err(ProviderError::Unavailable {
                provider: Provider::Reputation,
                status: 502,
                resource: "/v3/businesses".to_owned(),
            });
        }
        let mut full = record.clone();
        full.reviews = vec![ReviewSnippet {
            rating: 5,
            text: "Worth the wait.".to_owned(),
            author: None,
            url: None,
            created_at: None,
        }];
        full.photos = vec!["https://img.example.com/1.jpg".to_owned()];
        Ok(full)
    }
}

fn aggregator(
    listing: FakeListing,
    reputation: FakeReputation,
    timeout_ms: u64,
) -> Aggregator<FakeListing, FakeReputation> {
    Aggregator::new(
        listing,
        reputation,
        IdentityMatcher::default(),
        AggregatorConfig {
            provider_timeout: Duration::from_millis(timeout_ms),
            max_concurrent_lookups: 8,
        },
    )
}

#[tokio::test]
async fn search_preserves_listing_order_under_uneven_latency() {
    let names = ["Nopa", "Kin Khao", "Zuni Cafe", "Tartine", "Delfina", "Souvla"];
    let listings = names
        .iter()
        .enumerate()
        .map(|(i, n)| listing(&format!("k{i}"), n, &[]))
        .collect();
    // Earlier entries answer slower, so completion order is reversed.
    let behaviors: Vec<(&str, Behavior)> = names
        .iter()
        .enumerate()
        .map(|(i, n)| {
            (
                *n,
                Behavior::Match {
                    rating: 4.0,
                    delay_ms: 20 * (names.len() - i) as u64,
                },
            )
        })
        .collect();

    let agg = aggregator(FakeListing::ok(listings), FakeReputation::new(&behaviors), 2_000);
    let outcome = agg.search("dinner", "94110").await.unwrap();

    let got: Vec<&str> = outcome.restaurants.iter().map(|r| r.listing.name.as_str()).collect();
    assert_eq!(got, names);
    assert!(outcome.restaurants.iter().all(|r| r.reputation.is_matched()));
    assert_eq!(outcome.phase(), RequestPhase::Merged);
}

#[tokio::test]
async fn one_timeout_among_five_is_partial_results() {
    let names = ["A", "B", "C", "D", "E"];
    let listings = names
        .iter()
        .map(|n| listing(&n.to_lowercase(), n, &[]))
        .collect();
    let fast = Behavior::Match {
        rating: 4.5,
        delay_ms: 0,
    };
    let reputation = FakeReputation::new(&[
        ("A", fast.clone()),
        ("B", fast.clone()),
        ("C", Behavior::Hang),
        ("D", fast.clone()),
        ("E", fast),
    ]);

    let agg = aggregator(FakeListing::ok(listings), reputation, 150);
    let outcome = agg.search("anything", "94110").await.unwrap();

    assert_eq!(outcome.restaurants.len(), 5);
    assert_eq!(outcome.degraded_count(), 1);
    let slow = &outcome.restaurants[2];
    assert_eq!(slow.listing.name, "C");
    assert_eq!(slow.reputation, ReputationStatus::NoMatch);
    assert_eq!(slow.degradation.as_ref().map(|d| d.kind), Some("timeout"));
    assert_eq!(
        outcome.restaurants.iter().filter(|r| r.reputation.is_matched()).count(),
        4
    );

    let views = outcome.into_views().unwrap();
    assert!(views[2].degraded.is_some());
    assert!(!views[2].matched);
}

#[tokio::test]
async fn reputation_errors_degrade_single_entries() {
    let listings = vec![listing("a", "A", &[]), listing("b", "B", &[])];
    let reputation = FakeReputation::new(&[
        ("A", Behavior::Fail(429)),
        (
            "B",
            Behavior::Match {
                rating: 3.0,
                delay_ms: 0,
            },
        ),
    ]);

    let agg = aggregator(FakeListing::ok(listings), reputation, 1_000);
    let outcome = agg.search("x", "94110").await.unwrap();

    let first = outcome.restaurants[0].degradation.as_ref().unwrap();
    assert_eq!(first.kind, "rate_limited");
    assert_eq!(first.retry_after_secs, Some(60));
    assert_eq!(outcome.restaurants[1].rating(), Some(3.0));
}

#[tokio::test]
async fn no_match_is_explicit_marker() {
    let agg = aggregator(
        FakeListing::ok(vec![listing("m", "Mystery Spot", &[])]),
        FakeReputation::new(&[]),
        1_000,
    );
    let outcome = agg.search("x", "94110").await.unwrap();
    let entry = &outcome.restaurants[0];
    assert_eq!(entry.reputation, ReputationStatus::NoMatch);
    assert!(entry.rating().is_none());
    assert!(!entry.is_degraded());
}

#[tokio::test]
async fn listing_server_error_is_fatal() {
    let agg = aggregator(FakeListing::failing(503), FakeReputation::new(&[]), 1_000);
    let result = agg.search("sushi", "94110").await;
    assert!(
        matches!(
            result,
            Err(AggregateError::ProviderUnavailable(ProviderError::Unavailable { status: 503, .. }))
        ),
        "expected ProviderUnavailable, got: {result:?}"
    );
}

#[tokio::test]
async fn listing_rate_limit_surfaces_backoff() {
    let agg = aggregator(FakeListing::failing(429), FakeReputation::new(&[]), 1_000);
    let err = agg.search("sushi", "94110").await.unwrap_err();
    assert_eq!(err.retry_after_secs(), Some(42));
}

#[tokio::test]
async fn listing_not_found_is_empty_result() {
    let agg = aggregator(FakeListing::failing(404), FakeReputation::new(&[]), 1_000);
    let outcome = agg.search("sushi", "00000").await.unwrap();
    assert!(outcome.restaurants.is_empty());
}

#[tokio::test]
async fn detail_merges_menu_reviews_and_photos() {
    let listings = vec![
        listing("k1", "Kin Khao Express", &["Thai"]),
        listing("k2", "Kin Khao", &["Thai", "Noodles"]),
    ];
    let reputation = FakeReputation::new(&[(
        "Kin Khao",
        Behavior::Match {
            rating: 4.5,
            delay_ms: 0,
        },
    )]);

    let agg = aggregator(FakeListing::ok(listings), reputation, 1_000);
    let outcome = agg.get_detail("Kin Khao", "94102").await.unwrap().unwrap();

    assert_eq!(outcome.phase(), RequestPhase::Merged);
    let restaurant = &outcome.restaurant;
    assert_eq!(restaurant.listing.provider_id, "k2");
    assert_eq!(restaurant.listing.menu.len(), 1);
    let matched = restaurant.reputation.as_matched().unwrap();
    assert_eq!(matched.reviews.len(), 1);
    assert_eq!(matched.photos.len(), 1);

    let view = outcome.into_view().unwrap();
    assert_eq!(view.menu[0].price.to_string(), "18.95");
    assert_eq!(view.reviews[0].text, "Worth the wait.");
}

#[tokio::test]
async fn detail_reputation_failure_degrades_view() {
    let reputation = FakeReputation::new(&[("Nopa", Behavior::Fail(503))]);
    let agg = aggregator(
        FakeListing::ok(vec![listing("n", "Nopa", &[])]),
        reputation,
        1_000,
    );
    let outcome = agg.get_detail("Nopa", "94117").await.unwrap().unwrap();
    assert_eq!(outcome.restaurant.reputation, ReputationStatus::NoMatch);
    assert_eq!(
        outcome.restaurant.degradation.as_ref().map(|d| d.kind),
        Some("unavailable")
    );
    assert_eq!(outcome.restaurant.listing.menu.len(), 1);
}

#[tokio::test]
async fn detail_keeps_rating_when_only_reviews_fail() {
    let mut reputation = FakeReputation::new(&[(
        "Nopa",
        Behavior::Match {
            rating: 4.0,
            delay_ms: 0,
        },
    )]);
    reputation.detail_fails = true;
    let agg = aggregator(
        FakeListing::ok(vec![listing("n", "Nopa", &[])]),
        reputation,
        1_000,
    );
    let outcome = agg.get_detail("Nopa", "94117").await.unwrap().unwrap();
    assert_eq!(outcome.restaurant.rating(), Some(4.0));
    assert!(outcome.restaurant.is_degraded());
}

#[tokio::test]
async fn detail_unknown_restaurant_is_none() {
    let agg = aggregator(FakeListing::ok(Vec::new()), FakeReputation::new(&[]), 1_000);
    assert!(agg.get_detail("Nowhere", "94110").await.unwrap().is_none());
}

#[tokio::test]
async fn detail_listing_failure_is_fatal() {
    let agg = aggregator(FakeListing::failing(500), FakeReputation::new(&[]), 1_000);
    let result = agg.get_detail("Nopa", "94117").await;
    assert!(matches!(result, Err(AggregateError::ProviderUnavailable(_))));
}

#[tokio::test]
async fn summarize_counts_every_category_once() {
    let listings = vec![
        listing("a", "Kin Khao", &["Thai", "Noodles"]),
        listing("b", "Lers Ros", &["Thai"]),
        listing("c", "Mystery Spot", &[]),
    ];
    let fake = FakeListing::ok(listings);
    let agg = aggregator(fake, FakeReputation::new(&[]), 1_000);

    let dist = agg.summarize("94110").await.unwrap();
    assert_eq!(dist.count_for("Thai"), 2);
    assert_eq!(dist.count_for("Noodles"), 1);
    assert_eq!(dist.entries().len(), 2);
    assert_eq!(agg.listing().searches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn summarize_is_stable_under_reordering() {
    let mut listings = vec![
        listing("a", "A", &["Pizza"]),
        listing("b", "B", &["Thai", "Noodles"]),
        listing("c", "C", &["Pizza", "Salads"]),
        listing("d", "D", &["Noodles"]),
    ];
    let forward = aggregator(
        FakeListing::ok(listings.clone()),
        FakeReputation::new(&[]),
        1_000,
    )
    .summarize("94110")
    .await
    .unwrap();

    listings.reverse();
    listings.swap(0, 2);
    let shuffled = aggregator(FakeListing::ok(listings), FakeReputation::new(&[]), 1_000)
        .summarize("94110")
        .await
        .unwrap();

    assert_eq!(forward, shuffled);
}
