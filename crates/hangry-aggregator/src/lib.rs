//! Aggregation core: fans a listing search out to per-restaurant reputation
//! lookups, merges the two sides, and shapes the result for callers.
//!
//! Listing data is mandatory and its order is authoritative. Reputation data
//! is optional: a failed lookup degrades one entry, never the request.

pub mod aggregator;
pub mod error;
pub mod format;
pub mod matcher;
pub mod phase;
pub mod source;
pub mod summarizer;

pub use aggregator::{Aggregator, AggregatorConfig, DetailOutcome, SearchOutcome};
pub use error::AggregateError;
pub use format::{
    format_detail, format_distribution, format_restaurant, CuisineCountView, DegradedView,
    MenuItemView, RestaurantDetailView, RestaurantView, ReviewView,
};
pub use matcher::{
    normalize_name, IdentityMatcher, MatchQuery, MatchStrategy, NormalizedName, ProviderRanked,
};
pub use phase::{PhaseError, PhaseTracker, RequestPhase};
pub use source::{ListingSource, ReputationSource};
pub use summarizer::count_cuisines;
