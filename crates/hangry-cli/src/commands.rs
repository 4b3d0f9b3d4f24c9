//! Command handlers. Each one runs a single aggregation request and prints
//! the response contract as pretty JSON on stdout.

use std::sync::Arc;

use anyhow::Context;
use hangry_aggregator::{
    format_distribution, AggregateError, Aggregator, AggregatorConfig, IdentityMatcher,
};
use hangry_core::AppConfig;
use hangry_listing::ListingClient;
use hangry_reputation::{ReputationClient, ReputationClientConfig, TokenCache};
use serde::Serialize;

use crate::Commands;

pub(crate) type LiveAggregator = Aggregator<ListingClient, ReputationClient>;

pub(crate) fn build_aggregator(
    config: &AppConfig,
    tokens: Arc<TokenCache>,
) -> anyhow::Result<LiveAggregator> {
    let listing = ListingClient::with_base_url(
        &config.listing_api_key,
        config.provider_timeout_ms,
        &config.user_agent,
        &config.listing_base_url,
    )
    .context("failed to build listing client")?;

    let reputation = ReputationClient::with_base_url(
        reputation_client_config(config),
        tokens,
        &config.reputation_base_url,
    )
    .context("failed to build reputation client")?;

    Ok(Aggregator::new(
        listing,
        reputation,
        IdentityMatcher::from_kind(config.match_strategy, config.match_candidate_limit),
        AggregatorConfig::from_app_config(config),
    ))
}

fn reputation_client_config(config: &AppConfig) -> ReputationClientConfig {
    ReputationClientConfig {
        client_id: config.reputation_client_id.clone(),
        client_secret: config.reputation_client_secret.clone(),
        timeout_ms: config.provider_timeout_ms,
        user_agent: config.user_agent.clone(),
        review_limit: config.review_limit,
        photo_limit: config.photo_limit,
    }
}

pub(crate) async fn run(aggregator: &LiveAggregator, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Search { term, address } => {
            let outcome = aggregator
                .search(&term, &address)
                .await
                .map_err(request_error)?;
            if outcome.degraded_count() > 0 {
                tracing::warn!(
                    degraded = outcome.degraded_count(),
                    "some ratings are unavailable; showing listing data only for those"
                );
            }
            print_json(&outcome.into_views()?)
        }
        Commands::Detail { name, address } => {
            match aggregator
                .get_detail(&name, &address)
                .await
                .map_err(request_error)?
            {
                Some(outcome) => print_json(&outcome.into_view()?),
                None => anyhow::bail!("no restaurant named '{name}' near '{address}'"),
            }
        }
        Commands::Cuisines { address } => {
            let distribution = aggregator
                .summarize(&address)
                .await
                .map_err(request_error)?;
            print_json(&format_distribution(&distribution))
        }
    }
}

/// Rate limiting carries its back-off hint into the process error.
pub(crate) fn request_error(err: AggregateError) -> anyhow::Error {
    match err.retry_after_secs() {
        Some(secs) => anyhow::anyhow!("{err}; try again in {secs} seconds"),
        None => anyhow::Error::new(err),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render response")?;
    println!("{rendered}");
    Ok(())
}
