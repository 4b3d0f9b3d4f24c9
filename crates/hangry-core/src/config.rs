use crate::app_config::{AppConfig, Environment, MatchStrategyKind};
use crate::ConfigError;

pub const DEFAULT_LISTING_BASE_URL: &str = "https://api.eatstreet.com/publicapi/v1/";
pub const DEFAULT_REPUTATION_BASE_URL: &str = "https://api.yelp.com/";

/// Load application configuration from environment variables already in the process.
///
/// `.env` files are not read here; the binary loads them before argument parsing.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// A missing or blank provider secret is a startup error.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let listing_api_key = require("HANGRY_LISTING_API_KEY")?;
    let reputation_client_id = require("HANGRY_REPUTATION_CLIENT_ID")?;
    let reputation_client_secret = require("HANGRY_REPUTATION_CLIENT_SECRET")?;

    let env = parse_environment(&or_default("HANGRY_ENV", "development"));
    let log_level = or_default("HANGRY_LOG_LEVEL", "info");
    let listing_base_url = or_default("HANGRY_LISTING_BASE_URL", DEFAULT_LISTING_BASE_URL);
    let reputation_base_url =
        or_default("HANGRY_REPUTATION_BASE_URL", DEFAULT_REPUTATION_BASE_URL);

    let provider_timeout_ms = parse_u64("HANGRY_PROVIDER_TIMEOUT_MS", "5000")?;
    if provider_timeout_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "HANGRY_PROVIDER_TIMEOUT_MS".to_string(),
            reason: "timeout must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("HANGRY_USER_AGENT", "hangry/0.1 (restaurant-aggregator)");
    let max_concurrent_lookups = parse_usize("HANGRY_MAX_CONCURRENT_LOOKUPS", "8")?;
    let review_limit = parse_usize("HANGRY_REVIEW_LIMIT", "3")?;
    let photo_limit = parse_usize("HANGRY_PHOTO_LIMIT", "3")?;
    let match_strategy = parse_match_strategy(&or_default("HANGRY_MATCH_STRATEGY", "provider"))?;
    let match_candidate_limit = parse_u32("HANGRY_MATCH_CANDIDATE_LIMIT", "5")?;
    let token_refresh_margin_secs = parse_u64("HANGRY_TOKEN_REFRESH_MARGIN_SECS", "60")?;

    Ok(AppConfig {
        env,
        log_level,
        listing_api_key,
        listing_base_url,
        reputation_client_id,
        reputation_client_secret,
        reputation_base_url,
        provider_timeout_ms,
        user_agent,
        max_concurrent_lookups,
        review_limit,
        photo_limit,
        match_strategy,
        match_candidate_limit,
        token_refresh_margin_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_match_strategy(s: &str) -> Result<MatchStrategyKind, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "provider" => Ok(MatchStrategyKind::ProviderRanked),
        "name" => Ok(MatchStrategyKind::NormalizedName),
        other => Err(ConfigError::InvalidEnvVar {
            var: "HANGRY_MATCH_STRATEGY".to_string(),
            reason: format!("expected `provider` or `name`, got `{other}`"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
