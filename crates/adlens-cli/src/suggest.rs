//! `suggest` command: advertiser name lookup via SearchAPI.

use std::fmt::Write as _;

use adlens_core::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SEARCHAPI_BASE_URL, DEFAULT_SEARCHAPI_REGION};
use adlens_searchapi::{SearchApiClient, SearchResponse, MIN_QUERY_CHARS};
use clap::Args;

/// SearchAPI settings. Read from the environment so that `suggest` works
/// without any Apify configuration.
#[derive(Debug, Clone, Args)]
pub(crate) struct SearchArgs {
    #[arg(long, env = "SEARCHAPI_KEY", hide_env_values = true)]
    pub(crate) api_key: String,
    #[arg(long, env = "ADLENS_SEARCHAPI_REGION", default_value = DEFAULT_SEARCHAPI_REGION)]
    pub(crate) region: String,
    #[arg(long, env = "ADLENS_SEARCHAPI_BASE_URL", default_value = DEFAULT_SEARCHAPI_BASE_URL)]
    pub(crate) base_url: String,
}

/// Look up advertiser and domain suggestions for `query` and render them.
///
/// # Errors
///
/// Returns an error if the query is too short, the client cannot be built,
/// or the upstream request fails.
pub(crate) async fn run_suggest(args: &SearchArgs, query: &str) -> anyhow::Result<String> {
    if query.chars().count() < MIN_QUERY_CHARS {
        anyhow::bail!("query must be at least {MIN_QUERY_CHARS} characters");
    }

    let client = SearchApiClient::with_base_url(
        &args.api_key,
        DEFAULT_REQUEST_TIMEOUT_SECS,
        &args.base_url,
        &args.region,
    )?;
    let found = client.search_advertisers(query).await?;
    tracing::debug!(
        advertisers = found.advertisers.len(),
        domains = found.domains.len(),
        "suggestions received"
    );
    Ok(render_suggestions(&found))
}

pub(crate) fn render_suggestions(found: &SearchResponse) -> String {
    let mut out = String::new();
    if found.advertisers.is_empty() && found.domains.is_empty() {
        out.push_str("no suggestions\n");
        return out;
    }

    for advertiser in &found.advertisers {
        let verified = if advertiser.is_verified { " [verified]" } else { "" };
        let _ = writeln!(
            out,
            "{}{verified}  {}  {} ads {}-{}",
            advertiser.name,
            advertiser.region,
            advertiser.id,
            advertiser.ads_count.lower,
            advertiser.ads_count.upper
        );
    }
    for domain in &found.domains {
        let _ = writeln!(out, "domain: {}", domain.name);
    }
    out
}
