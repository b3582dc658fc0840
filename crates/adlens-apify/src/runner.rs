//! Transport seam between the job orchestrator and Apify.

use async_trait::async_trait;
use serde_json::Value;

use crate::client::ApifyClient;
use crate::error::ApifyError;
use crate::input::AdsLibraryInput;
use crate::types::RunData;

/// The three remote calls a scrape job is made of.
///
/// [`ApifyClient`] is the HTTP implementation; tests substitute scripted
/// runners to drive the poll loop without a network.
#[async_trait]
pub trait JobRunner: Send + Sync {
    async fn start_run(&self, input: &AdsLibraryInput) -> Result<RunData, ApifyError>;

    async fn get_run(&self, run_id: &str) -> Result<RunData, ApifyError>;

    async fn get_dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>, ApifyError>;
}

#[async_trait]
impl JobRunner for ApifyClient {
    async fn start_run(&self, input: &AdsLibraryInput) -> Result<RunData, ApifyError> {
        ApifyClient::start_run(self, input).await
    }

    async fn get_run(&self, run_id: &str) -> Result<RunData, ApifyError> {
        ApifyClient::get_run(self, run_id).await
    }

    async fn get_dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>, ApifyError> {
        ApifyClient::get_dataset_items::<Value>(self, dataset_id).await
    }
}
