use thiserror::Error;

/// Default back-off hint when a provider answers 429 without `Retry-After`.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// The external provider a request was sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Listing,
    Reputation,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Listing => write!(f, "listing"),
            Provider::Reputation => write!(f, "reputation"),
        }
    }
}

/// Failure taxonomy shared by both provider clients.
///
/// Raw transport errors never escape a client: every failure is folded into
/// one of these variants so the aggregator can apply a single policy.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credentials are missing or were rejected by the token exchange.
    #[error("{provider} authentication failed: {reason}")]
    Auth { provider: Provider, reason: String },

    /// The provider rejected the credential on a data request (401/403).
    #[error("{provider} rejected the request as unauthorized")]
    Unauthorized { provider: Provider },

    #[error("{provider} rate limited the request (retry after {retry_after_secs}s)")]
    RateLimited {
        provider: Provider,
        retry_after_secs: u64,
    },

    #[error("{provider} has no data at {resource}")]
    NotFound { provider: Provider, resource: String },

    #[error("{provider} unavailable (status {status}) at {resource}")]
    Unavailable {
        provider: Provider,
        status: u16,
        resource: String,
    },

    #[error("{provider} request timed out after {timeout_ms}ms")]
    Timeout { provider: Provider, timeout_ms: u64 },

    #[error("{provider} network error: {reason}")]
    Network { provider: Provider, reason: String },

    /// The client itself could not be built (bad base URL, TLS setup).
    #[error("{provider} client misconfigured: {reason}")]
    Misconfigured { provider: Provider, reason: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ProviderError {
    /// Maps a non-2xx HTTP status onto the taxonomy.
    ///
    /// 401/403 become [`ProviderError::Unauthorized`], 404 [`ProviderError::NotFound`],
    /// 429 [`ProviderError::RateLimited`]; anything else is [`ProviderError::Unavailable`].
    #[must_use]
    pub fn from_status(
        provider: Provider,
        status: u16,
        retry_after_secs: Option<u64>,
        resource: &str,
    ) -> Self {
        match status {
            401 | 403 => ProviderError::Unauthorized { provider },
            404 => ProviderError::NotFound {
                provider,
                resource: resource.to_owned(),
            },
            429 => ProviderError::RateLimited {
                provider,
                retry_after_secs: retry_after_secs.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            },
            _ => ProviderError::Unavailable {
                provider,
                status,
                resource: resource.to_owned(),
            },
        }
    }

    /// Folds a failure that produced no HTTP status (connect, TLS, body read)
    /// into the taxonomy. Timeouts carry the client's configured budget.
    #[must_use]
    pub fn transport(
        provider: Provider,
        timed_out: bool,
        timeout_ms: u64,
        reason: impl std::fmt::Display,
    ) -> Self {
        if timed_out {
            ProviderError::Timeout {
                provider,
                timeout_ms,
            }
        } else {
            ProviderError::Network {
                provider,
                reason: reason.to_string(),
            }
        }
    }

    /// Which provider produced the error, when known.
    #[must_use]
    pub fn provider(&self) -> Option<Provider> {
        match self {
            ProviderError::Auth { provider, .. }
            | ProviderError::Unauthorized { provider }
            | ProviderError::RateLimited { provider, .. }
            | ProviderError::NotFound { provider, .. }
            | ProviderError::Unavailable { provider, .. }
            | ProviderError::Timeout { provider, .. }
            | ProviderError::Network { provider, .. }
            | ProviderError::Misconfigured { provider, .. } => Some(*provider),
            ProviderError::Deserialize { .. } => None,
        }
    }

    /// Suggested back-off for rate-limited requests.
    #[must_use]
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited {
                retry_after_secs, ..
            } => Some(*retry_after_secs),
            _ => None,
        }
    }

    /// `NotFound` is a valid "no data" answer rather than a failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound { .. })
    }

    /// Short machine-readable label used in logs and degraded responses.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Auth { .. } => "auth_error",
            ProviderError::Unauthorized { .. } => "unauthorized",
            ProviderError::RateLimited { .. } => "rate_limited",
            ProviderError::NotFound { .. } => "not_found",
            ProviderError::Unavailable { .. } => "unavailable",
            ProviderError::Timeout { .. } => "timeout",
            ProviderError::Network { .. } => "network_error",
            ProviderError::Misconfigured { .. } => "misconfigured",
            ProviderError::Deserialize { .. } => "malformed_response",
        }
    }
}

/// Reads a numeric `Retry-After` header value. HTTP-date values are ignored
/// and fall back to [`DEFAULT_RETRY_AFTER_SECS`] in [`ProviderError::from_status`].
#[must_use]
pub fn parse_retry_after(value: Option<&str>) -> Option<u64> {
    value.and_then(|s| s.trim().parse::<u64>().ok())
}
