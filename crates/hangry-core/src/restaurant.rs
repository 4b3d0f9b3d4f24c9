//! Request-scoped domain types shared by the provider clients and the
//! aggregator. Nothing here is persisted.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::error::ProviderError;

/// A restaurant as reported by the listing provider. Source of truth for
/// whether an order can be placed right now.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    /// Opaque listing-provider identifier used for detail and menu calls.
    pub provider_id: String,
    pub name: String,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub is_open: bool,
    pub order_url: Option<String>,
    pub logo_url: Option<String>,
    /// Cuisine tags, trimmed and deduplicated.
    pub cuisines: BTreeSet<String>,
    /// Menu items in provider order. Empty on search results; filled by the
    /// detail call.
    pub menu: Vec<MenuItem>,
}

impl ListingRecord {
    /// Location string for a reputation lookup: the record's own street
    /// address when known, otherwise the address the user searched from.
    #[must_use]
    pub fn location_query(&self, fallback: &str) -> String {
        let parts: Vec<&str> = [
            self.street_address.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.zip.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

        if parts.is_empty() {
            fallback.to_owned()
        } else {
            parts.join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub name: String,
    pub description: Option<String>,
    /// Exact decimal price; never routed through `f64`.
    pub price: Decimal,
    /// Menu section the item was listed under, e.g. `"Appetizers"`.
    pub category: String,
}

/// A restaurant as reported by the reputation provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ReputationRecord {
    pub external_id: String,
    pub name: String,
    pub city: Option<String>,
    /// Star rating in `[1.0, 5.0]`.
    pub rating: f64,
    /// Total review count reported by the provider, not `reviews.len()`.
    pub review_count: u32,
    pub url: Option<String>,
    pub reviews: Vec<ReviewSnippet>,
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSnippet {
    pub rating: u8,
    pub text: String,
    pub author: Option<String>,
    pub url: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// Outcome of the identity match for one listing record.
#[derive(Debug, Clone, PartialEq)]
pub enum ReputationStatus {
    Matched(ReputationRecord),
    /// No reputation record was found, or the lookup failed. Distinct from
    /// any real rating.
    NoMatch,
}

impl ReputationStatus {
    #[must_use]
    pub fn as_matched(&self) -> Option<&ReputationRecord> {
        match self {
            ReputationStatus::Matched(record) => Some(record),
            ReputationStatus::NoMatch => None,
        }
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, ReputationStatus::Matched(_))
    }
}

impl From<Option<ReputationRecord>> for ReputationStatus {
    fn from(value: Option<ReputationRecord>) -> Self {
        value.map_or(ReputationStatus::NoMatch, ReputationStatus::Matched)
    }
}

/// Why the reputation side of an entry is missing when it failed rather
/// than simply found nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degradation {
    pub kind: &'static str,
    pub message: String,
    pub retry_after_secs: Option<u64>,
}

impl From<&ProviderError> for Degradation {
    fn from(err: &ProviderError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            retry_after_secs: err.retry_after_secs(),
        }
    }
}

/// Listing data merged with the optional reputation match.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRestaurant {
    pub listing: ListingRecord,
    pub reputation: ReputationStatus,
    pub degradation: Option<Degradation>,
}

impl UnifiedRestaurant {
    #[must_use]
    pub fn merge(listing: ListingRecord, reputation: Option<ReputationRecord>) -> Self {
        Self {
            listing,
            reputation: reputation.into(),
            degradation: None,
        }
    }

    /// Listing-only entry whose reputation lookup failed.
    #[must_use]
    pub fn degraded(listing: ListingRecord, err: &ProviderError) -> Self {
        Self {
            listing,
            reputation: ReputationStatus::NoMatch,
            degradation: Some(Degradation::from(err)),
        }
    }

    #[must_use]
    pub fn rating(&self) -> Option<f64> {
        self.reputation.as_matched().map(|r| r.rating)
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuisineCount {
    pub category: String,
    pub count: usize,
}

/// Restaurants per cuisine category, sorted by count descending and then
/// category name ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CuisineDistribution {
    entries: Vec<CuisineCount>,
}

impl CuisineDistribution {
    /// Builds a distribution from unordered `(category, count)` pairs.
    /// Zero counts are dropped.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (String, usize)>,
    {
        let mut entries: Vec<CuisineCount> = counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(category, count)| CuisineCount { category, count })
            .collect();
        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.category.cmp(&b.category))
        });
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[CuisineCount] {
        &self.entries
    }

    #[must_use]
    pub fn count_for(&self, category: &str) -> usize {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map_or(0, |e| e.count)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Provider;

    fn listing(name: &str) -> ListingRecord {
        ListingRecord {
            provider_id: "abc".to_owned(),
            name: name.to_owned(),
            street_address: Some("3200 24th St".to_owned()),
            city: Some("San Francisco".to_owned()),
            state: Some("CA".to_owned()),
            zip: Some("94110".to_owned()),
            is_open: true,
            order_url: None,
            logo_url: None,
            cuisines: BTreeSet::new(),
            menu: Vec::new(),
        }
    }

    #[test]
    fn location_query_joins_address_parts() {
        let record = listing("Pancho Villa");
        assert_eq!(
            record.location_query("94110"),
            "3200 24th St, San Francisco, CA, 94110"
        );
    }

    #[test]
    fn location_query_falls_back_without_address() {
        let mut record = listing("Pancho Villa");
        record.street_address = None;
        record.city = None;
        record.state = Some("  ".to_owned());
        record.zip = None;
        assert_eq!(record.location_query("94110"), "94110");
    }

    #[test]
    fn merge_without_reputation_is_no_match() {
        let unified = UnifiedRestaurant::merge(listing("Nopa"), None);
        assert_eq!(unified.reputation, ReputationStatus::NoMatch);
        assert!(unified.rating().is_none());
        assert!(!unified.is_degraded());
    }

    #[test]
    fn degraded_entry_records_failure_kind() {
        let err = ProviderError::RateLimited {
            provider: Provider::Reputation,
            retry_after_secs: 30,
        };
        let unified = UnifiedRestaurant::degraded(listing("Nopa"), &err);
        assert_eq!(unified.reputation, ReputationStatus::NoMatch);
        let degradation = unified.degradation.expect("degradation should be set");
        assert_eq!(degradation.kind, "rate_limited");
        assert_eq!(degradation.retry_after_secs, Some(30));
    }

    #[test]
    fn distribution_sorts_by_count_then_name() {
        let dist = CuisineDistribution::from_counts([
            ("Thai".to_owned(), 2),
            ("Burgers".to_owned(), 5),
            ("Noodles".to_owned(), 2),
            ("Empty".to_owned(), 0),
        ]);
        let names: Vec<&str> = dist.entries().iter().map(|e| e.category.as_str()).collect();
        assert_eq!(names, ["Burgers", "Noodles", "Thai"]);
        assert_eq!(dist.count_for("Empty"), 0);
    }
}
