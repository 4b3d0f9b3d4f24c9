//! HTTP client for the reputation provider.
//!
//! Authentication is OAuth2 client credentials: the client exchanges its id
//! and secret for a bearer token at `oauth2/token` and keeps it in a shared
//! [`TokenCache`]. A data request answered with 401/403 invalidates that token
//! and is repeated exactly once with a fresh one.

use std::sync::Arc;
use std::time::Duration;

use hangry_core::{parse_retry_after, Credential, Provider, ProviderError, ReputationRecord};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::normalize::{normalize_business, normalize_review};
use crate::token::TokenCache;
use crate::types::{ApiBusiness, BusinessSearchResponse, ReviewsResponse, TokenResponse};

/// Settings for [`ReputationClient`].
#[derive(Clone)]
pub struct ReputationClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub timeout_ms: u64,
    pub user_agent: String,
    /// Maximum reviews kept on a detail record.
    pub review_limit: usize,
    /// Maximum photos kept on any record.
    pub photo_limit: usize,
}

impl std::fmt::Debug for ReputationClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReputationClientConfig")
            .field("client_id", &"[redacted]")
            .field("client_secret", &"[redacted]")
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .field("review_limit", &self.review_limit)
            .field("photo_limit", &self.photo_limit)
            .finish()
    }
}

pub struct ReputationClient {
    client: Client,
    config: ReputationClientConfig,
    base_url: Url,
    tokens: Arc<TokenCache>,
}

impl ReputationClient {
    /// Creates a client for the API at `base_url` (from configuration, or a
    /// wiremock server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Misconfigured`] if the HTTP client cannot be
    /// built or `base_url` is not a usable http(s) base.
    pub fn with_base_url(
        config: ReputationClientConfig,
        tokens: Arc<TokenCache>,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ProviderError::Misconfigured {
                provider: Provider::Reputation,
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| ProviderError::Misconfigured {
                provider: Provider::Reputation,
                reason: format!("invalid base URL '{base_url}'"),
            })?;

        Ok(Self {
            client,
            config,
            base_url,
            tokens,
        })
    }

    /// Returns a bearer credential, exchanging client credentials if no
    /// valid token is cached.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Auth`] if the secrets are blank or rejected.
    /// - [`ProviderError::Network`] / [`ProviderError::Timeout`] on transport failure.
    pub async fn authenticate(&self) -> Result<Credential, ProviderError> {
        self.access_token().await.map(Credential::Bearer)
    }

    /// Searches businesses by `term` near `location`, returning at most
    /// `limit` candidates in the provider's relevance order. Candidates
    /// without a valid rating are dropped.
    ///
    /// # Errors
    ///
    /// Any [`ProviderError`] from the token exchange or the search request.
    pub async fn search(
        &self,
        term: &str,
        location: &str,
        limit: u32,
    ) -> Result<Vec<ReputationRecord>, ProviderError> {
        let limit = limit.max(1).to_string();
        let url = self.endpoint(
            &["v3", "businesses", "search"],
            &[("term", term), ("location", location), ("limit", limit.as_str())],
        )?;
        let response: BusinessSearchResponse =
            self.authorized_get(&url, "business search").await?;

        tracing::debug!(
            term,
            location,
            candidates = response.businesses.len(),
            "reputation search complete"
        );

        Ok(response
            .businesses
            .into_iter()
            .filter_map(|b| normalize_business(b, self.config.photo_limit))
            .collect())
    }

    /// Completes a search hit with photos and reviews. The business detail
    /// and the reviews are requested concurrently. A business without reviews
    /// (404) keeps an empty review list.
    ///
    /// # Errors
    ///
    /// Any [`ProviderError`] from the detail request, or a non-404 error from
    /// the reviews request.
    pub async fn get_detail(
        &self,
        record: &ReputationRecord,
    ) -> Result<ReputationRecord, ProviderError> {
        let id = record.external_id.as_str();
        let detail_url = self.endpoint(&["v3", "businesses", id], &[])?;
        let reviews_url = self.endpoint(&["v3", "businesses", id, "reviews"], &[])?;

        let (detail, reviews) = tokio::join!(
            self.authorized_get::<ApiBusiness>(&detail_url, "business detail"),
            self.authorized_get::<ReviewsResponse>(&reviews_url, "business reviews"),
        );

        let mut full = match normalize_business(detail?, self.config.photo_limit) {
            Some(full) => full,
            // Detail lost its rating since the search; keep what search saw.
            None => record.clone(),
        };

        full.reviews = match reviews {
            Ok(body) => body
                .reviews
                .into_iter()
                .take(self.config.review_limit)
                .map(normalize_review)
                .collect(),
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(full)
    }

    /// Drops the cached token. The cache is shared, so this affects every
    /// client holding it.
    pub async fn shutdown(&self) {
        self.tokens.clear().await;
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        self.tokens.get_or_refresh(|| self.fetch_token()).await
    }

    /// Exchanges client credentials for a bearer token.
    async fn fetch_token(&self) -> Result<(String, Option<u64>), ProviderError> {
        if self.config.client_id.trim().is_empty() || self.config.client_secret.trim().is_empty()
        {
            return Err(ProviderError::Auth {
                provider: Provider::Reputation,
                reason: "client id or secret is empty".to_owned(),
            });
        }

        let url = self.endpoint(&["oauth2", "token"], &[])?;
        let response = self
            .client
            .post(url.clone())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if matches!(status.as_u16(), 400 | 401 | 403) {
            return Err(ProviderError::Auth {
                provider: Provider::Reputation,
                reason: format!("token exchange rejected with status {status}"),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::from_status(
                Provider::Reputation,
                status.as_u16(),
                parse_retry_after(
                    response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok()),
                ),
                url.path(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
                context: "token exchange".to_owned(),
                source: e,
            })?;

        if token.access_token.is_empty() {
            return Err(ProviderError::Auth {
                provider: Provider::Reputation,
                reason: "token exchange returned an empty access token".to_owned(),
            });
        }

        tracing::info!(
            token_type = token.token_type.as_deref().unwrap_or("bearer"),
            expires_in = ?token.expires_in,
            "obtained reputation access token"
        );
        Ok((token.access_token, token.expires_in))
    }

    /// Sends an authenticated GET. On 401/403 the token is invalidated and
    /// the request is repeated once with a fresh token.
    async fn authorized_get<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, ProviderError> {
        let token = self.access_token().await?;
        match self.send_get(url, &token, context).await {
            Err(ProviderError::Unauthorized { .. }) => {
                tracing::info!(context, "reputation token rejected; refreshing once");
                self.tokens.invalidate(&token).await;
                let fresh = self.access_token().await?;
                self.send_get(url, &fresh, context).await
            }
            other => other,
        }
    }

    async fn send_get<T: DeserializeOwned>(
        &self,
        url: &Url,
        token: &str,
        context: &str,
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(
                Provider::Reputation,
                status.as_u16(),
                parse_retry_after(
                    response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok()),
                ),
                url.path(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
            context: format!("{context} ({})", url.path()),
            source: e,
        })
    }

    fn transport_error(&self, err: &reqwest::Error) -> ProviderError {
        ProviderError::transport(
            Provider::Reputation,
            err.is_timeout(),
            self.config.timeout_ms,
            err,
        )
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ProviderError::Misconfigured {
                provider: Provider::Reputation,
                reason: format!("base URL '{}' cannot take a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
