//! Two-provider orchestration for search, detail, and cuisine summary.

use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use hangry_core::{
    AppConfig, CuisineDistribution, Degradation, ListingRecord, Provider, ProviderError,
    ReputationRecord, UnifiedRestaurant,
};

use crate::error::AggregateError;
use crate::format::{format_detail, format_restaurant, RestaurantDetailView, RestaurantView};
use crate::matcher::{normalize_name, IdentityMatcher, MatchQuery};
use crate::phase::{PhaseTracker, RequestPhase};
use crate::source::{ListingSource, ReputationSource};
use crate::summarizer::count_cuisines;

const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Upper bound for every single provider call.
    pub provider_timeout: Duration,
    /// Reputation lookups in flight at once during a search.
    pub max_concurrent_lookups: usize,
}

impl AggregatorConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            provider_timeout: Duration::from_millis(config.provider_timeout_ms),
            max_concurrent_lookups: config.max_concurrent_lookups,
        }
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }
}

/// Merged search results in listing-provider order.
#[derive(Debug)]
pub struct SearchOutcome {
    pub restaurants: Vec<UnifiedRestaurant>,
    phase: PhaseTracker,
}

impl SearchOutcome {
    #[must_use]
    pub fn phase(&self) -> RequestPhase {
        self.phase.phase()
    }

    /// Entries whose reputation lookup failed.
    #[must_use]
    pub fn degraded_count(&self) -> usize {
        self.restaurants.iter().filter(|r| r.is_degraded()).count()
    }

    /// Formats every entry, completing the request.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::Phase`] if the outcome was already formatted.
    pub fn into_views(mut self) -> Result<Vec<RestaurantView>, AggregateError> {
        self.phase.advance(RequestPhase::Formatted)?;
        Ok(self.restaurants.iter().map(format_restaurant).collect())
    }
}

/// One restaurant with its full menu and, when matched, reviews and photos.
#[derive(Debug)]
pub struct DetailOutcome {
    pub restaurant: UnifiedRestaurant,
    phase: PhaseTracker,
}

impl DetailOutcome {
    #[must_use]
    pub fn phase(&self) -> RequestPhase {
        self.phase.phase()
    }

    /// # Errors
    ///
    /// Returns [`AggregateError::Phase`] if the outcome was already formatted.
    pub fn into_view(mut self) -> Result<RestaurantDetailView, AggregateError> {
        self.phase.advance(RequestPhase::Formatted)?;
        Ok(format_detail(&self.restaurant))
    }
}

/// Combines a mandatory listing source with an optional reputation source.
///
/// Nothing is spawned: dropping a returned future cancels every provider
/// call it started.
pub struct Aggregator<L, R> {
    listing: L,
    reputation: R,
    matcher: IdentityMatcher,
    config: AggregatorConfig,
}

impl<L: ListingSource, R: ReputationSource> Aggregator<L, R> {
    #[must_use]
    pub fn new(
        listing: L,
        reputation: R,
        matcher: IdentityMatcher,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            listing,
            reputation,
            matcher,
            config,
        }
    }

    pub fn listing(&self) -> &L {
        &self.listing
    }

    pub fn reputation(&self) -> &R {
        &self.reputation
    }

    /// Listing search for `term` near `address`, each result enriched with
    /// its reputation match.
    ///
    /// Reputation lookups run concurrently, bounded by
    /// `max_concurrent_lookups`, and each lands in its listing's slot. A
    /// failed lookup degrades only its own entry.
    ///
    /// # Errors
    ///
    /// [`AggregateError::RateLimited`] or [`AggregateError::ProviderUnavailable`]
    /// when the listing search fails. A listing 404 is an empty result.
    pub async fn search(&self, term: &str, address: &str) -> Result<SearchOutcome, AggregateError> {
        let mut phase = PhaseTracker::start("search");
        phase.advance(RequestPhase::ProvidersDispatched)?;

        let listings = match self.listing_search(Some(term), address).await {
            Ok(listings) => listings,
            Err(e) => return Err(listing_failure(&mut phase, e)),
        };
        phase.advance(RequestPhase::PartialResults)?;

        let restaurants: Vec<UnifiedRestaurant> = stream::iter(listings)
            .map(|listing| self.enrich(listing, address))
            .buffered(self.config.max_concurrent_lookups.max(1))
            .collect()
            .await;
        phase.advance(RequestPhase::Merged)?;

        let outcome = SearchOutcome { restaurants, phase };
        tracing::info!(
            term,
            address,
            results = outcome.restaurants.len(),
            degraded = outcome.degraded_count(),
            "search merged"
        );
        Ok(outcome)
    }

    /// Detail view for the restaurant called `name` near `address`.
    ///
    /// The listing chain (search by name, then detail with menu) and the
    /// reputation chain (match, then reviews and photos) run concurrently.
    /// Returns `Ok(None)` when the listing provider knows no such restaurant.
    ///
    /// # Errors
    ///
    /// [`AggregateError::RateLimited`] or [`AggregateError::ProviderUnavailable`]
    /// when the listing chain fails. Reputation failures only degrade the view.
    pub async fn get_detail(
        &self,
        name: &str,
        address: &str,
    ) -> Result<Option<DetailOutcome>, AggregateError> {
        let mut phase = PhaseTracker::start("detail");
        phase.advance(RequestPhase::ProvidersDispatched)?;

        let query = MatchQuery::by_name(name, address);
        let (listing, (reputation, reputation_err)) = tokio::join!(
            self.listing_detail(name, address),
            self.reputation_detail(&query),
        );

        let listing = match listing {
            Ok(listing) => listing,
            Err(e) => return Err(listing_failure(&mut phase, e)),
        };
        phase.advance(RequestPhase::PartialResults)?;

        let Some(listing) = listing else {
            tracing::info!(restaurant = name, address, "no listing found for detail request");
            return Ok(None);
        };

        let mut restaurant = UnifiedRestaurant::merge(listing, reputation);
        if let Some(err) = reputation_err {
            tracing::warn!(
                restaurant = %restaurant.listing.name,
                error = %err,
                kind = err.kind(),
                "reputation detail failed; view degraded"
            );
            restaurant.degradation = Some(Degradation::from(&err));
        }
        phase.advance(RequestPhase::Merged)?;

        Ok(Some(DetailOutcome { restaurant, phase }))
    }

    /// Cuisine distribution over every restaurant the listing provider
    /// returns for `address`.
    ///
    /// # Errors
    ///
    /// Same as [`Aggregator::search`] for the listing call.
    pub async fn summarize(&self, address: &str) -> Result<CuisineDistribution, AggregateError> {
        let mut phase = PhaseTracker::start("cuisine_summary");
        phase.advance(RequestPhase::ProvidersDispatched)?;

        let records = match self.listing_search(None, address).await {
            Ok(records) => records,
            Err(e) => return Err(listing_failure(&mut phase, e)),
        };
        phase.advance(RequestPhase::PartialResults)?;

        let distribution = count_cuisines(&records);
        phase.advance(RequestPhase::Merged)?;

        tracing::info!(
            address,
            restaurants = records.len(),
            categories = distribution.entries().len(),
            "cuisine summary computed"
        );
        Ok(distribution)
    }

    async fn listing_search(
        &self,
        term: Option<&str>,
        address: &str,
    ) -> Result<Vec<ListingRecord>, ProviderError> {
        match self
            .timed(Provider::Listing, self.listing.search(term, address))
            .await
        {
            Err(e) if e.is_not_found() => {
                tracing::debug!(address, "listing provider has no restaurants for address");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Picks the listing whose normalized name equals `name`, falling back
    /// to the provider's first result, and fetches its menu.
    async fn listing_detail(
        &self,
        name: &str,
        address: &str,
    ) -> Result<Option<ListingRecord>, ProviderError> {
        let mut records = self.listing_search(Some(name), address).await?;
        if records.is_empty() {
            return Ok(None);
        }

        let target = normalize_name(name);
        let pos = records
            .iter()
            .position(|r| normalize_name(&r.name) == target)
            .unwrap_or(0);
        let picked = records.swap_remove(pos);

        match self
            .timed(Provider::Listing, self.listing.get_detail(&picked.provider_id))
            .await
        {
            Ok(full) => Ok(Some(full)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Match plus reviews and photos. A failure after the match keeps the
    /// search hit so the rating still shows.
    async fn reputation_detail(
        &self,
        query: &MatchQuery,
    ) -> (Option<ReputationRecord>, Option<ProviderError>) {
        let hit = match self
            .timed(Provider::Reputation, self.matcher.resolve(&self.reputation, query))
            .await
        {
            Ok(Some(hit)) => hit,
            Ok(None) => return (None, None),
            Err(e) => return (None, Some(e)),
        };

        match self
            .timed(Provider::Reputation, self.reputation.get_detail(&hit))
            .await
        {
            Ok(full) => (Some(full), None),
            Err(e) => (Some(hit), Some(e)),
        }
    }

    async fn enrich(&self, listing: ListingRecord, address: &str) -> UnifiedRestaurant {
        let query = MatchQuery::for_listing(&listing, address);
        match self
            .timed(Provider::Reputation, self.matcher.resolve(&self.reputation, &query))
            .await
        {
            Ok(hit) => UnifiedRestaurant::merge(listing, hit),
            Err(err) => {
                tracing::warn!(
                    restaurant = %listing.name,
                    error = %err,
                    kind = err.kind(),
                    "reputation lookup failed; entry degraded"
                );
                UnifiedRestaurant::degraded(listing, &err)
            }
        }
    }

    async fn timed<T>(
        &self,
        provider: Provider,
        call: impl Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        let limit = self.config.provider_timeout;
        tokio::time::timeout(limit, call)
            .await
            .unwrap_or_else(|_| {
                Err(ProviderError::Timeout {
                    provider,
                    timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                })
            })
    }
}

fn listing_failure(phase: &mut PhaseTracker, err: ProviderError) -> AggregateError {
    if let Err(phase_err) = phase.advance(RequestPhase::AllFailed) {
        return phase_err.into();
    }
    tracing::error!(error = %err, kind = err.kind(), "listing provider failed; request aborted");
    err.into()
}
