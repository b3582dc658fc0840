//! Scrape job orchestration: submit an actor run, poll it to a terminal
//! status within a wall-clock ceiling, then download its dataset.
//!
//! The poll loop is strictly sequential: it sleeps for the configured
//! interval, issues one status request, and classifies the answer. Only the
//! status request tolerates transport failures (see
//! [`TransportErrorPolicy`]); submit and fetch are single attempts.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use adlens_core::{AppConfig, ScrapeOptions, DEFAULT_POLL_CEILING_SECS, DEFAULT_POLL_INTERVAL_SECS};
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use tokio::time::Instant;

use crate::error::ApifyError;
use crate::input::AdsLibraryInput;
use crate::runner::JobRunner;
use crate::types::{RunData, RunStatus};

/// Run statuses after which the actor will make no further progress and
/// produced no usable dataset.
pub const TERMINAL_FAILURE_STATUSES: [RunStatus; 3] =
    [RunStatus::Failed, RunStatus::Aborted, RunStatus::TimedOut];

/// What the poll loop does when a status request fails in transit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportErrorPolicy {
    /// Skip the tick and keep polling until the ceiling.
    #[default]
    Continue,
    /// Surface the failure as [`JobError::StatusCheck`].
    Abort,
}

/// Timing and failure policy of the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub ceiling: Duration,
    pub on_transport_error: TransportErrorPolicy,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            ceiling: Duration::from_secs(DEFAULT_POLL_CEILING_SECS),
            on_transport_error: TransportErrorPolicy::default(),
        }
    }
}

impl PollPolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.poll_interval_secs),
            ceiling: Duration::from_secs(config.poll_ceiling_secs),
            on_transport_error: TransportErrorPolicy::Continue,
        }
    }
}

/// Terminal outcomes of a scrape job other than success.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("failed to start scraper: {0}")]
    Submit(#[source] ApifyError),

    #[error("scraper {}", .0.as_str().to_lowercase())]
    RunFailed(RunStatus),

    #[error("scraper timed out: run {run_id} not finished after {elapsed_secs}s")]
    TimedOut { run_id: String, elapsed_secs: u64 },

    #[error("status check failed for run {run_id}: {source}")]
    StatusCheck {
        run_id: String,
        #[source]
        source: ApifyError,
    },

    #[error("failed to fetch results of run {run_id}: {source}")]
    Fetch {
        run_id: String,
        #[source]
        source: ApifyError,
    },

    #[error("run {run_id} succeeded without a dataset id")]
    MissingDataset { run_id: String },

    #[error("run {run_id} returned no ads")]
    EmptyResult { run_id: String },

    #[error("scraper run cancelled")]
    Cancelled,
}

/// Decision taken after observing a run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    Wait,
    Fetch,
    Fail(RunStatus),
}

/// Maps a run status onto the next step of the poll loop.
#[must_use]
pub fn classify(status: RunStatus) -> PollStep {
    if status == RunStatus::Succeeded {
        PollStep::Fetch
    } else if TERMINAL_FAILURE_STATUSES.contains(&status) {
        PollStep::Fail(status)
    } else {
        PollStep::Wait
    }
}

/// Local view of one actor run. Mutated only by polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeJob {
    pub run_id: String,
    pub status: RunStatus,
    pub dataset_id: Option<String>,
    /// Apify-side timestamps, as last reported.
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ScrapeJob {
    fn submitted(run: RunData) -> Self {
        Self {
            run_id: run.id,
            status: run.status,
            dataset_id: run.default_dataset_id,
            started_at: run.started_at,
            finished_at: run.finished_at,
        }
    }

    fn observe(&mut self, run: RunData) {
        self.status = run.status;
        if run.default_dataset_id.is_some() {
            self.dataset_id = run.default_dataset_id;
        }
        self.started_at = run.started_at.or(self.started_at);
        self.finished_at = run.finished_at.or(self.finished_at);
    }

    /// How long the actor itself ran, once Apify reports both ends.
    #[must_use]
    pub fn remote_runtime(&self) -> Option<chrono::Duration> {
        Some(self.finished_at? - self.started_at?)
    }
}

/// Drives scrape jobs against a [`JobRunner`].
#[derive(Clone)]
pub struct JobOrchestrator {
    runner: Arc<dyn JobRunner>,
    policy: PollPolicy,
}

impl JobOrchestrator {
    #[must_use]
    pub fn new(runner: Arc<dyn JobRunner>, policy: PollPolicy) -> Self {
        Self { runner, policy }
    }

    #[must_use]
    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Scrapes the ad library for `advertiser_name`: start, poll, fetch.
    ///
    /// Returns the raw dataset items, guaranteed non-empty.
    ///
    /// # Errors
    ///
    /// Every variant of [`JobError`] except [`JobError::Cancelled`].
    pub async fn run_scrape_job(
        &self,
        advertiser_name: &str,
        options: &ScrapeOptions,
    ) -> Result<Vec<Value>, JobError> {
        let input = AdsLibraryInput::for_advertiser(advertiser_name, options);
        tracing::info!(
            advertiser = advertiser_name,
            period = %options.period,
            country = %options.country_code,
            limit = options.limit,
            "starting ads library scrape"
        );

        let run = self
            .runner
            .start_run(&input)
            .await
            .map_err(JobError::Submit)?;
        let mut job = ScrapeJob::submitted(run);
        tracing::info!(run_id = %job.run_id, "Apify run started, polling for completion");

        self.poll_until_settled(&mut job).await?;
        tracing::info!(
            run_id = %job.run_id,
            dataset_id = ?job.dataset_id,
            remote_secs = job.remote_runtime().map(|d| d.num_seconds()),
            "run completed, fetching results"
        );

        self.fetch_results(&job).await
    }

    /// Like [`JobOrchestrator::run_scrape_job`], but gives up as soon as
    /// `cancel` resolves. The remote run is left to finish on its own.
    ///
    /// # Errors
    ///
    /// [`JobError::Cancelled`] on cancellation, otherwise as
    /// [`JobOrchestrator::run_scrape_job`].
    pub async fn run_scrape_job_until<C>(
        &self,
        advertiser_name: &str,
        options: &ScrapeOptions,
        cancel: C,
    ) -> Result<Vec<Value>, JobError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                tracing::warn!(advertiser = advertiser_name, "scrape job cancelled by caller");
                Err(JobError::Cancelled)
            }
            result = self.run_scrape_job(advertiser_name, options) => result,
        }
    }

    async fn poll_until_settled(&self, job: &mut ScrapeJob) -> Result<(), JobError> {
        let started = Instant::now();
        let mut ticks = 0u32;

        while started.elapsed() < self.policy.ceiling {
            // A status check never lands past the ceiling: when the next full
            // interval would overshoot, wait out the remainder and give up.
            let remaining = self.policy.ceiling.saturating_sub(started.elapsed());
            if self.policy.interval > remaining {
                tokio::time::sleep(remaining).await;
                break;
            }
            tokio::time::sleep(self.policy.interval).await;
            ticks += 1;

            match self.runner.get_run(&job.run_id).await {
                Ok(run) => job.observe(run),
                Err(err) => match self.policy.on_transport_error {
                    TransportErrorPolicy::Continue => {
                        tracing::debug!(
                            run_id = %job.run_id,
                            tick = ticks,
                            error = %err,
                            "status check failed, will poll again"
                        );
                        continue;
                    }
                    TransportErrorPolicy::Abort => {
                        return Err(JobError::StatusCheck {
                            run_id: job.run_id.clone(),
                            source: err,
                        });
                    }
                },
            }

            match classify(job.status) {
                PollStep::Fetch => return Ok(()),
                PollStep::Fail(status) => {
                    tracing::warn!(run_id = %job.run_id, %status, "Apify run ended without results");
                    return Err(JobError::RunFailed(status));
                }
                PollStep::Wait => {
                    tracing::debug!(run_id = %job.run_id, status = %job.status, tick = ticks, "run still in progress");
                }
            }
        }

        tracing::warn!(
            run_id = %job.run_id,
            ticks,
            ceiling_secs = self.policy.ceiling.as_secs(),
            "gave up waiting for Apify run"
        );
        Err(JobError::TimedOut {
            run_id: job.run_id.clone(),
            elapsed_secs: started.elapsed().as_secs(),
        })
    }

    async fn fetch_results(&self, job: &ScrapeJob) -> Result<Vec<Value>, JobError> {
        let Some(dataset_id) = job.dataset_id.as_deref() else {
            return Err(JobError::MissingDataset {
                run_id: job.run_id.clone(),
            });
        };

        let items = self
            .runner
            .get_dataset_items(dataset_id)
            .await
            .map_err(|source| JobError::Fetch {
                run_id: job.run_id.clone(),
                source,
            })?;

        if items.is_empty() {
            return Err(JobError::EmptyResult {
                run_id: job.run_id.clone(),
            });
        }

        tracing::info!(run_id = %job.run_id, count = items.len(), "fetched ad library records");
        Ok(items)
    }
}

#[cfg(test)]
#[path = "job_test.rs"]
mod tests;
