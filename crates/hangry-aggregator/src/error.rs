use hangry_core::ProviderError;
use thiserror::Error;

use crate::phase::PhaseError;

/// Request-level failure. Only the listing provider can produce one;
/// reputation failures degrade single entries instead.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("listing provider rate limited the request; retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("listing provider unavailable: {0}")]
    ProviderUnavailable(#[source] ProviderError),

    #[error(transparent)]
    Phase(#[from] PhaseError),
}

impl AggregateError {
    /// Suggested back-off when the request was rate limited.
    #[must_use]
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            AggregateError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}

impl From<ProviderError> for AggregateError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::RateLimited {
                retry_after_secs, ..
            } => AggregateError::RateLimited { retry_after_secs },
            other => AggregateError::ProviderUnavailable(other),
        }
    }
}
