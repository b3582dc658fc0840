//! The `analyze` entry point: validate, consult the cache, scrape, build,
//! store.

use std::future::{self, Future};
use std::sync::Arc;

use adlens_apify::{ApifyError, JobError, JobOrchestrator, RunStatus};
use adlens_core::{Period, ScrapeOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{build_analysis, BuildError, SharedAnalysis};
use crate::cache::AnalysisCache;
use crate::raw::RawAdRecord;

/// Per-request overrides of the configured scrape defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub period: Option<Period>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    /// Skip the cache read. The fresh result is still stored.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Why an analysis could not be produced. `Display` is the message shown to
/// dashboard users.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Advertiser name is required")]
    MissingAdvertiserName,

    #[error("Failed to start scraper")]
    Submission(#[source] ApifyError),

    #[error("Scraper {}", .0.as_str().to_lowercase())]
    RunFailed(RunStatus),

    #[error("Scraper timed out")]
    TimedOut,

    #[error("Failed to check scraper status")]
    StatusCheck(#[source] ApifyError),

    #[error("Failed to fetch results")]
    Fetch(#[source] Option<ApifyError>),

    #[error("No ads found for this advertiser")]
    NoAds,

    #[error("Scraper run cancelled")]
    Cancelled,
}

impl AnalyzeError {
    /// HTTP status the failure maps to.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MissingAdvertiserName => 400,
            Self::NoAds => 404,
            Self::TimedOut => 504,
            Self::Submission(_)
            | Self::RunFailed(_)
            | Self::StatusCheck(_)
            | Self::Fetch(_)
            | Self::Cancelled => 500,
        }
    }
}

impl From<JobError> for AnalyzeError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::Submit(source) => Self::Submission(source),
            JobError::RunFailed(status) => Self::RunFailed(status),
            JobError::TimedOut { .. } => Self::TimedOut,
            JobError::StatusCheck { source, .. } => Self::StatusCheck(source),
            JobError::Fetch { source, .. } => Self::Fetch(Some(source)),
            JobError::MissingDataset { .. } => Self::Fetch(None),
            JobError::EmptyResult { .. } => Self::NoAds,
            JobError::Cancelled => Self::Cancelled,
        }
    }
}

impl From<BuildError> for AnalyzeError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::NoRecords => Self::NoAds,
        }
    }
}

/// A successful analysis and where it came from.
#[derive(Debug, Clone)]
pub struct Analyzed {
    pub analysis: SharedAnalysis,
    pub from_cache: bool,
}

/// Tagged result shape returned to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SharedAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
}

impl From<Result<Analyzed, AnalyzeError>> for AnalyzeResponse {
    fn from(result: Result<Analyzed, AnalyzeError>) -> Self {
        match result {
            Ok(Analyzed {
                analysis,
                from_cache,
            }) => Self {
                success: true,
                data: Some(analysis),
                error: None,
                from_cache: Some(from_cache),
            },
            Err(err) => Self {
                success: false,
                data: None,
                error: Some(err.to_string()),
                from_cache: None,
            },
        }
    }
}

/// Runs advertiser analyses against a scrape orchestrator and a cache.
#[derive(Clone)]
pub struct Analyzer {
    orchestrator: JobOrchestrator,
    cache: Arc<dyn AnalysisCache>,
    defaults: ScrapeOptions,
}

impl Analyzer {
    #[must_use]
    pub fn new(
        orchestrator: JobOrchestrator,
        cache: Arc<dyn AnalysisCache>,
        defaults: ScrapeOptions,
    ) -> Self {
        Self {
            orchestrator,
            cache,
            defaults,
        }
    }

    /// Produces the analysis for `advertiser_name`.
    ///
    /// # Errors
    ///
    /// See [`AnalyzeError`]; [`AnalyzeError::Cancelled`] is never returned.
    pub async fn analyze(
        &self,
        advertiser_name: &str,
        request: &AnalyzeRequest,
    ) -> Result<Analyzed, AnalyzeError> {
        self.analyze_until(advertiser_name, request, future::pending())
            .await
    }

    /// Like [`Analyzer::analyze`], abandoning the scrape when `cancel`
    /// resolves.
    ///
    /// # Errors
    ///
    /// See [`AnalyzeError`].
    pub async fn analyze_until<C>(
        &self,
        advertiser_name: &str,
        request: &AnalyzeRequest,
        cancel: C,
    ) -> Result<Analyzed, AnalyzeError>
    where
        C: Future<Output = ()>,
    {
        let name = advertiser_name.trim();
        if name.is_empty() {
            return Err(AnalyzeError::MissingAdvertiserName);
        }

        if !request.force_refresh {
            if let Some(analysis) = self.cached(name).await {
                tracing::info!(advertiser = name, "serving cached analysis");
                return Ok(Analyzed {
                    analysis,
                    from_cache: true,
                });
            }
        }

        let options = ScrapeOptions::merged(
            &self.defaults,
            request.period,
            request.country_code.as_deref(),
            request.limit,
        );
        let items = self
            .orchestrator
            .run_scrape_job_until(name, &options, cancel)
            .await?;

        let records: Vec<RawAdRecord> = items.into_iter().map(RawAdRecord::from_value).collect();
        let analysis = Arc::new(build_analysis(records)?);
        tracing::info!(
            advertiser = name,
            total_ads = analysis.advertiser.total_ads,
            active_ads = analysis.advertiser.active_ads,
            total_reach = analysis.audience.total_reach,
            "analysis built"
        );

        if let Err(e) = self.cache.put(name, Arc::clone(&analysis)).await {
            tracing::warn!(advertiser = name, error = %e, "failed to store analysis in cache");
        }

        Ok(Analyzed {
            analysis,
            from_cache: false,
        })
    }

    async fn cached(&self, name: &str) -> Option<SharedAnalysis> {
        match self.cache.get(name).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(advertiser = name, error = %e, "cache read failed, scraping instead");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
