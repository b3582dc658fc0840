//! HTTP client for the Apify v2 REST API.
//!
//! Covers the three calls a scrape job needs: start an actor run, read a
//! run's status, and download a dataset. Non-2xx answers surface as
//! [`ApifyError::Api`] with the response body as message.

use std::time::Duration;

use adlens_core::{AppConfig, DEFAULT_ACTOR_ID, DEFAULT_APIFY_BASE_URL};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApifyError;
use crate::types::{ApiResponse, RunData};

/// Client for one Apify actor.
///
/// Use [`ApifyClient::new`] for production or [`ApifyClient::with_base_url`]
/// to point at a mock server in tests.
pub struct ApifyClient {
    client: Client,
    token: String,
    base_url: String,
    actor_id: String,
}

impl ApifyClient {
    /// Creates a client for the default Ads Library actor on the public API.
    ///
    /// # Errors
    ///
    /// Returns [`ApifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, ApifyError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_APIFY_BASE_URL, DEFAULT_ACTOR_ID)
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// See [`ApifyClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ApifyError> {
        Self::with_base_url(
            &config.apify_api_token,
            config.apify_request_timeout_secs,
            &config.apify_base_url,
            &config.apify_actor_id,
        )
    }

    /// Creates a client with a custom base URL and actor id.
    ///
    /// # Errors
    ///
    /// Returns [`ApifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApifyError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute URL.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
        actor_id: &str,
    ) -> Result<Self, ApifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("adlens/0.1 (ad-library-research)")
            .build()?;

        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|_| ApifyError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url: trimmed.to_owned(),
            actor_id: actor_id.to_owned(),
        })
    }

    /// Starts an actor run. Returns immediately with run metadata.
    ///
    /// # Errors
    ///
    /// - [`ApifyError::Http`] on network failure.
    /// - [`ApifyError::Api`] on a non-2xx status.
    /// - [`ApifyError::Deserialize`] if the envelope does not parse.
    pub async fn start_run<I: Serialize + ?Sized>(&self, input: &I) -> Result<RunData, ApifyError> {
        let url = self.endpoint(&format!("acts/{}/runs", self.actor_id));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let envelope: ApiResponse<RunData> = Self::read_json(resp, "start run").await?;
        Ok(envelope.data)
    }

    /// Reads the current state of a run.
    ///
    /// # Errors
    ///
    /// Same as [`ApifyClient::start_run`].
    pub async fn get_run(&self, run_id: &str) -> Result<RunData, ApifyError> {
        let url = self.endpoint(&format!("actor-runs/{run_id}"));
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let envelope: ApiResponse<RunData> =
            Self::read_json(resp, &format!("run status {run_id}")).await?;
        Ok(envelope.data)
    }

    /// Fetches all items of a dataset as JSON.
    ///
    /// # Errors
    ///
    /// Same as [`ApifyClient::start_run`].
    pub async fn get_dataset_items<T: DeserializeOwned>(
        &self,
        dataset_id: &str,
    ) -> Result<Vec<T>, ApifyError> {
        let url = self.endpoint(&format!("datasets/{dataset_id}/items?format=json"));
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::read_json(resp, &format!("dataset items {dataset_id}")).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Asserts a 2xx status and parses the body as `T`.
    async fn read_json<T: DeserializeOwned>(
        resp: Response,
        context: &str,
    ) -> Result<T, ApifyError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ApifyError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}
