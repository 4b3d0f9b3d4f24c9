//! Shared configuration, domain types, and the provider error taxonomy used by
//! every `hangry` crate.

pub mod app_config;
pub mod config;
pub mod credential;
pub mod error;
pub mod restaurant;

pub use app_config::{AppConfig, Environment, MatchStrategyKind};
pub use config::load_app_config_from_env;
pub use credential::Credential;
pub use error::{parse_retry_after, Provider, ProviderError};
pub use restaurant::{
    CuisineCount, CuisineDistribution, Degradation, ListingRecord, MenuItem, ReputationRecord,
    ReputationStatus, ReviewSnippet, UnifiedRestaurant,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
