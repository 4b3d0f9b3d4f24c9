//! Process-wide bearer token cache for the reputation provider.
//!
//! The cache is created once at startup and shared by every request through
//! an `Arc`. Refresh happens while holding an async mutex, so concurrent
//! callers that find the token missing or expired wait for a single token
//! exchange instead of each starting their own. [`TokenCache::invalidate`]
//! only discards the token the caller saw rejected; if another caller already
//! replaced it, the fresh token survives.

use std::future::Future;
use std::time::{Duration, Instant};

use hangry_core::ProviderError;
use tokio::sync::Mutex;

/// Lifetime assumed when the token response carries no `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3_600;

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct TokenCache {
    state: Mutex<Option<CachedToken>>,
    refresh_margin: Duration,
}

impl TokenCache {
    /// `refresh_margin` is subtracted from the provider-reported lifetime so
    /// tokens are replaced before the provider starts rejecting them.
    #[must_use]
    pub fn new(refresh_margin: Duration) -> Self {
        Self {
            state: Mutex::new(None),
            refresh_margin,
        }
    }

    /// Returns the cached token, or runs `fetch` under the lock to obtain a
    /// new one. `fetch` yields the token and its lifetime in seconds.
    ///
    /// # Errors
    ///
    /// Propagates the error from `fetch`; the cache stays empty in that case.
    pub async fn get_or_refresh<F, Fut>(&self, fetch: F) -> Result<String, ProviderError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(String, Option<u64>), ProviderError>>,
    {
        let mut state = self.state.lock().await;
        if let Some(cached) = state.as_ref() {
            if Instant::now() < cached.expires_at {
                return Ok(cached.access_token.clone());
            }
            tracing::debug!("reputation token expired; refreshing");
        }

        let (access_token, expires_in) = fetch().await?;
        let lifetime = Duration::from_secs(expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS))
            .saturating_sub(self.refresh_margin);
        *state = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        tracing::debug!(lifetime_secs = lifetime.as_secs(), "reputation token cached");
        Ok(access_token)
    }

    /// Drops the cached token if it is still `stale`. Returns `true` when the
    /// token was removed.
    pub async fn invalidate(&self, stale: &str) -> bool {
        let mut state = self.state.lock().await;
        if state.as_ref().is_some_and(|t| t.access_token == stale) {
            *state = None;
            true
        } else {
            false
        }
    }

    /// Forgets any cached token. Called on shutdown.
    pub async fn clear(&self) {
        self.state.lock().await.take();
    }

    /// Whether a token that has not yet expired is cached.
    pub async fn has_valid_token(&self) -> bool {
        self.state
            .lock()
            .await
            .as_ref()
            .is_some_and(|t| Instant::now() < t.expires_at)
    }
}
