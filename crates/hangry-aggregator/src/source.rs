//! Provider seams used by the aggregator.
//!
//! The aggregator is generic over these traits so its ordering, isolation and
//! timeout behavior can be exercised against in-process fakes. The real HTTP
//! clients implement them by delegating to their inherent methods.

use std::future::Future;

use hangry_core::{ListingRecord, ProviderError, ReputationRecord};
use hangry_listing::ListingClient;
use hangry_reputation::ReputationClient;

/// Source of listing records (menus, ordering, open/closed status).
pub trait ListingSource: Sync {
    /// Restaurants near `address`, optionally filtered by `term`, in the
    /// provider's order.
    fn search(
        &self,
        term: Option<&str>,
        address: &str,
    ) -> impl Future<Output = Result<Vec<ListingRecord>, ProviderError>> + Send;

    /// Full record for one restaurant, menu included.
    fn get_detail(
        &self,
        provider_id: &str,
    ) -> impl Future<Output = Result<ListingRecord, ProviderError>> + Send;
}

/// Source of reputation records (ratings, reviews, photos).
pub trait ReputationSource: Sync {
    /// At most `limit` candidates for `term` near `location`, in the
    /// provider's relevance order.
    fn search(
        &self,
        term: &str,
        location: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<ReputationRecord>, ProviderError>> + Send;

    /// Completes a search hit with reviews and photos.
    fn get_detail(
        &self,
        record: &ReputationRecord,
    ) -> impl Future<Output = Result<ReputationRecord, ProviderError>> + Send;
}

impl ListingSource for ListingClient {
    async fn search(
        &self,
        term: Option<&str>,
        address: &str,
    ) -> Result<Vec<ListingRecord>, ProviderError> {
        ListingClient::search(self, term, address).await
    }

    async fn get_detail(&self, provider_id: &str) -> Result<ListingRecord, ProviderError> {
        ListingClient::get_detail(self, provider_id).await
    }
}

impl ReputationSource for ReputationClient {
    async fn search(
        &self,
        term: &str,
        location: &str,
        limit: u32,
    ) -> Result<Vec<ReputationRecord>, ProviderError> {
        ReputationClient::search(self, term, location, limit).await
    }

    async fn get_detail(
        &self,
        record: &ReputationRecord,
    ) -> Result<ReputationRecord, ProviderError> {
        ReputationClient::get_detail(self, record).await
    }
}
