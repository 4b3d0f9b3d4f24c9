//! HTTP client for the listing provider's public API.
//!
//! Every non-2xx status is mapped onto [`ProviderError`] and every transport
//! failure is folded into [`ProviderError::Timeout`] or
//! [`ProviderError::Network`]. Nothing is retried here.

use std::time::Duration;

use hangry_core::{parse_retry_after, Credential, ListingRecord, Provider, ProviderError};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::normalize::{normalize_menu, normalize_restaurant};
use crate::types::{ApiMenuCategory, RestaurantResponse, SearchResponse};

const API_KEY_HEADER: &str = "X-Access-Token";

/// Client for the listing provider.
///
/// The base URL comes from configuration, so tests point it at a mock server.
pub struct ListingClient {
    client: Client,
    api_key: String,
    base_url: Url,
    timeout_ms: u64,
}

impl ListingClient {
    /// Creates a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Misconfigured`] if the HTTP client cannot be
    /// built or `base_url` is not a usable http(s) base.
    pub fn with_base_url(
        api_key: &str,
        timeout_ms: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .connect_timeout(Duration::from_millis(timeout_ms))
            .user_agent(user_agent)
            .build()
            .map_err(|e| ProviderError::Misconfigured {
                provider: Provider::Listing,
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        // Exactly one trailing slash so relative paths append instead of
        // replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| ProviderError::Misconfigured {
                provider: Provider::Listing,
                reason: format!("invalid base URL '{base_url}'"),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            timeout_ms,
        })
    }

    /// Returns the static API key credential.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Auth`] if the key is blank.
    pub fn authenticate(&self) -> Result<Credential, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::Auth {
                provider: Provider::Listing,
                reason: "API key is empty".to_owned(),
            });
        }
        Ok(Credential::ApiKey(self.api_key.clone()))
    }

    /// Searches restaurants near `address`, optionally filtered by `term`.
    ///
    /// With `term = None` the provider returns its full listing set for the
    /// address. Results keep the provider's order.
    ///
    /// # Errors
    ///
    /// Any [`ProviderError`] from the request; a 404 surfaces as
    /// [`ProviderError::NotFound`] and is left to the caller to interpret.
    pub async fn search(
        &self,
        term: Option<&str>,
        address: &str,
    ) -> Result<Vec<ListingRecord>, ProviderError> {
        let mut query = vec![("method", "both"), ("street-address", address)];
        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            query.push(("search", term));
        }
        let url = self.endpoint(&["restaurant", "search"], &query)?;
        let response: SearchResponse = self.get_json(url, "restaurant search").await?;

        tracing::debug!(
            address,
            term = term.unwrap_or(""),
            count = response.restaurants.len(),
            "listing search complete"
        );

        Ok(response
            .restaurants
            .into_iter()
            .map(normalize_restaurant)
            .collect())
    }

    /// Fetches the full record for one restaurant: detail and menu are
    /// requested concurrently and merged. A restaurant without a menu (404)
    /// yields an empty menu.
    ///
    /// # Errors
    ///
    /// Any [`ProviderError`] from the detail request, or a non-404 error from
    /// the menu request.
    pub async fn get_detail(&self, provider_id: &str) -> Result<ListingRecord, ProviderError> {
        let detail_url = self.endpoint(&["restaurant", provider_id], &[])?;
        let menu_url = self.endpoint(&["restaurant", provider_id, "menu"], &[])?;

        let (detail, menu) = tokio::join!(
            self.get_json::<RestaurantResponse>(detail_url, "restaurant detail"),
            self.get_json::<Vec<ApiMenuCategory>>(menu_url, "restaurant menu"),
        );

        let mut record = normalize_restaurant(detail?.restaurant);
        record.menu = match menu {
            Ok(categories) => normalize_menu(categories),
            Err(e) if e.is_not_found() => {
                tracing::debug!(provider_id, "restaurant has no menu");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        Ok(record)
    }

    fn transport_error(&self, err: &reqwest::Error) -> ProviderError {
        ProviderError::transport(Provider::Listing, err.is_timeout(), self.timeout_ms, err)
    }

    /// Builds a request URL from path segments and query parameters, with
    /// every segment and value percent-encoded.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ProviderError::Misconfigured {
                provider: Provider::Listing,
                reason: format!("base URL '{}' cannot take a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Sends an authenticated GET, maps the status, and decodes the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(
                Provider::Listing,
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
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
