//! HTTP client for SearchAPI's advertiser search engine.
//!
//! Wraps `reqwest` with API key handling and typed response
//! deserialization. Non-2xx answers surface as [`SearchApiError::Api`].

use std::time::Duration;

use adlens_core::{AppConfig, DEFAULT_SEARCHAPI_BASE_URL};
use reqwest::{Client, Url};

use crate::error::SearchApiError;
use crate::types::SearchResponse;

const SEARCH_PATH: &str = "api/v1/search";
const ENGINE: &str = "google_ads_transparency_center_advertiser_search";
const NUM_ADVERTISERS: &str = "10";
const NUM_DOMAINS: &str = "5";

/// Queries shorter than this (in characters) are answered with no
/// suggestions and never sent upstream.
pub const MIN_QUERY_CHARS: usize = 2;

/// Client for SearchAPI.
///
/// Use [`SearchApiClient::new`] for production or
/// [`SearchApiClient::with_base_url`] to point at a mock server in tests.
pub struct SearchApiClient {
    client: Client,
    api_key: String,
    base_url: Url,
    region: String,
}

impl SearchApiClient {
    /// Creates a client pointed at the production SearchAPI.
    ///
    /// # Errors
    ///
    /// Returns [`SearchApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, region: &str) -> Result<Self, SearchApiError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_SEARCHAPI_BASE_URL, region)
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchApiError::MissingApiKey`] when `SEARCHAPI_KEY` is
    /// unset, otherwise see [`SearchApiClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, SearchApiError> {
        let api_key = config
            .searchapi_key
            .as_deref()
            .ok_or(SearchApiError::MissingApiKey)?;
        Self::with_base_url(
            api_key,
            config.apify_request_timeout_secs,
            &config.searchapi_base_url,
            &config.searchapi_region,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SearchApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchApiError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
        region: &str,
    ) -> Result<Self, SearchApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("adlens/0.1 (ad-library-research)")
            .build()?;

        // Trailing slash so `join` appends to the path instead of replacing
        // its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| SearchApiError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            region: region.to_owned(),
        })
    }

    /// Looks up advertisers and domains matching `query`.
    ///
    /// Returns an empty response without a request when `query` is shorter
    /// than [`MIN_QUERY_CHARS`].
    ///
    /// # Errors
    ///
    /// - [`SearchApiError::Http`] on network failure.
    /// - [`SearchApiError::Api`] on a non-2xx status.
    /// - [`SearchApiError::Deserialize`] if the body does not parse.
    pub async fn search_advertisers(&self, query: &str) -> Result<SearchResponse, SearchApiError> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(SearchResponse::default());
        }

        let url = self.build_url(query)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), query, "SearchAPI request failed");
            return Err(SearchApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SearchApiError::Deserialize {
                context: format!("advertiser search(q={query})"),
                source: e,
            })?;
        tracing::debug!(
            query,
            advertisers = parsed.advertisers.len(),
            domains = parsed.domains.len(),
            "advertiser suggestions fetched"
        );
        Ok(parsed)
    }

    fn build_url(&self, query: &str) -> Result<Url, SearchApiError> {
        let mut url = self
            .base_url
            .join(SEARCH_PATH)
            .map_err(|_| SearchApiError::InvalidBaseUrl(self.base_url.to_string()))?;
        url.query_pairs_mut()
            .append_pair("engine", ENGINE)
            .append_pair("q", query)
            .append_pair("api_key", &self.api_key)
            .append_pair("num_advertisers", NUM_ADVERTISERS)
            .append_pair("num_domains", NUM_DOMAINS)
            .append_pair("region", &self.region);
        Ok(url)
    }
}
