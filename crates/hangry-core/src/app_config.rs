#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How a listing record is resolved to a reputation-provider record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategyKind {
    /// Ask the reputation provider for its single best hit and trust it.
    ProviderRanked,
    /// Fetch several candidates and compare normalized names locally.
    NormalizedName,
}

impl std::fmt::Display for MatchStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrategyKind::ProviderRanked => write!(f, "provider"),
            MatchStrategyKind::NormalizedName => write!(f, "name"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub listing_api_key: String,
    pub listing_base_url: String,
    pub reputation_client_id: String,
    pub reputation_client_secret: String,
    pub reputation_base_url: String,
    pub provider_timeout_ms: u64,
    pub user_agent: String,
    pub max_concurrent_lookups: usize,
    pub review_limit: usize,
    pub photo_limit: usize,
    pub match_strategy: MatchStrategyKind,
    pub match_candidate_limit: u32,
    pub token_refresh_margin_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("listing_api_key", &"[redacted]")
            .field("listing_base_url", &self.listing_base_url)
            .field("reputation_client_id", &"[redacted]")
            .field("reputation_client_secret", &"[redacted]")
            .field("reputation_base_url", &self.reputation_base_url)
            .field("provider_timeout_ms", &self.provider_timeout_ms)
            .field("user_agent", &self.user_agent)
            .field("max_concurrent_lookups", &self.max_concurrent_lookups)
            .field("review_limit", &self.review_limit)
            .field("photo_limit", &self.photo_limit)
            .field("match_strategy", &self.match_strategy)
            .field("match_candidate_limit", &self.match_candidate_limit)
            .field("token_refresh_margin_secs", &self.token_refresh_margin_secs)
            .finish()
    }
}
