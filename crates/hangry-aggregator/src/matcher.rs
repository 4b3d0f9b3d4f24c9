//! Identity matching between listing and reputation records.
//!
//! The two providers share no key, so a listing record is resolved by asking
//! the reputation provider for candidates and letting a [`MatchStrategy`]
//! choose among them. Zero surviving candidates is "no match", not an error.

use hangry_core::{ListingRecord, MatchStrategyKind, ProviderError, ReputationRecord};

use crate::source::ReputationSource;

/// Trailing words that do not distinguish one restaurant from another.
const NAME_SUFFIXES: &[&str] = &[
    "restaurant",
    "restaurants",
    "inc",
    "llc",
    "co",
    "ltd",
    "corp",
];

/// What the reputation provider is asked for, and what candidates are
/// compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    pub name: String,
    pub city: Option<String>,
    pub location: String,
}

impl MatchQuery {
    /// Query for a listing record. The record's own address is used as the
    /// search location when it has one, `fallback_address` otherwise.
    #[must_use]
    pub fn for_listing(listing: &ListingRecord, fallback_address: &str) -> Self {
        Self {
            name: listing.name.clone(),
            city: listing.city.clone(),
            location: listing.location_query(fallback_address),
        }
    }

    /// Query built only from what the caller typed.
    #[must_use]
    pub fn by_name(name: &str, address: &str) -> Self {
        Self {
            name: name.trim().to_owned(),
            city: None,
            location: address.trim().to_owned(),
        }
    }
}

/// Chooses the reputation record that corresponds to a listing.
pub trait MatchStrategy: Send + Sync {
    /// How many candidates to request from the reputation provider.
    fn candidate_limit(&self) -> u32;

    /// Picks one candidate. `candidates` is in the provider's relevance order.
    fn select(
        &self,
        query: &MatchQuery,
        candidates: Vec<ReputationRecord>,
    ) -> Option<ReputationRecord>;
}

/// Requests the provider's single best hit and trusts its ranking.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderRanked;

impl MatchStrategy for ProviderRanked {
    fn candidate_limit(&self) -> u32 {
        1
    }

    fn select(
        &self,
        _query: &MatchQuery,
        candidates: Vec<ReputationRecord>,
    ) -> Option<ReputationRecord> {
        candidates.into_iter().next()
    }
}

/// Fetches several candidates and compares normalized names locally:
/// exact equality first, then containment in either direction. Candidates in
/// another city are skipped when both sides know their city. Ties go to the
/// provider's order.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedName {
    candidate_limit: u32,
}

impl NormalizedName {
    #[must_use]
    pub fn new(candidate_limit: u32) -> Self {
        Self {
            candidate_limit: candidate_limit.max(1),
        }
    }
}

impl MatchStrategy for NormalizedName {
    fn candidate_limit(&self) -> u32 {
        self.candidate_limit
    }

    fn select(
        &self,
        query: &MatchQuery,
        candidates: Vec<ReputationRecord>,
    ) -> Option<ReputationRecord> {
        let target = normalize_name(&query.name);
        if target.is_empty() {
            return None;
        }

        let mut scoped: Vec<(String, ReputationRecord)> = candidates
            .into_iter()
            .filter(|c| same_city(query.city.as_deref(), c.city.as_deref()))
            .map(|c| (normalize_name(&c.name), c))
            .collect();

        let pos = scoped
            .iter()
            .position(|(name, _)| *name == target)
            .or_else(|| {
                scoped.iter().position(|(name, _)| {
                    !name.is_empty() && (name.contains(&target) || target.contains(name.as_str()))
                })
            })?;
        Some(scoped.swap_remove(pos).1)
    }
}

fn same_city(listing: Option<&str>, candidate: Option<&str>) -> bool {
    match (listing, candidate) {
        (Some(a), Some(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
        _ => true,
    }
}

/// Canonical form of a restaurant name for comparison.
///
/// Case-folds, spells `&` as "and", drops punctuation and whitespace, a
/// leading "the", and trailing corporate or generic suffixes. A name made
/// only of such words keeps its last word.
///
/// ```
/// use hangry_aggregator::normalize_name;
///
/// assert_eq!(normalize_name("The Slanted Door Restaurant"), "slanteddoor");
/// assert_eq!(normalize_name("Flour & Water, Inc."), "flourandwater");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .replace('&', " and ")
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let mut words: Vec<&str> = folded.split_whitespace().collect();
    if words.len() > 1 && words[0] == "the" {
        words.remove(0);
    }
    while words.len() > 1 && words.last().is_some_and(|w| NAME_SUFFIXES.contains(w)) {
        words.pop();
    }
    words.concat()
}

/// Resolves listing records to reputation records with a pluggable strategy.
pub struct IdentityMatcher {
    strategy: Box<dyn MatchStrategy>,
}

impl IdentityMatcher {
    pub fn new(strategy: impl MatchStrategy + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }

    /// Builds the strategy selected in configuration.
    #[must_use]
    pub fn from_kind(kind: MatchStrategyKind, candidate_limit: u32) -> Self {
        match kind {
            MatchStrategyKind::ProviderRanked => Self::new(ProviderRanked),
            MatchStrategyKind::NormalizedName => Self::new(NormalizedName::new(candidate_limit)),
        }
    }

    /// Looks `query` up on the reputation provider and selects a match.
    ///
    /// # Errors
    ///
    /// Any [`ProviderError`] from the reputation search except
    /// [`ProviderError::NotFound`], which is "no match".
    pub async fn resolve<R: ReputationSource>(
        &self,
        source: &R,
        query: &MatchQuery,
    ) -> Result<Option<ReputationRecord>, ProviderError> {
        let candidates = match source
            .search(&query.name, &query.location, self.strategy.candidate_limit())
            .await
        {
            Ok(candidates) => candidates,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e),
        };

        let found = candidates.len();
        let selected = self.strategy.select(query, candidates);
        tracing::debug!(
            restaurant = %query.name,
            candidates = found,
            matched = selected.is_some(),
            "identity match resolved"
        );
        Ok(selected)
    }
}

impl Default for IdentityMatcher {
    fn default() -> Self {
        Self::new(ProviderRanked)
    }
}

impl std::fmt::Debug for IdentityMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityMatcher")
            .field("candidate_limit", &self.strategy.candidate_limit())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
