pub mod client;
pub mod error;
pub mod input;
pub mod job;
pub mod runner;
pub mod types;

pub use client::ApifyClient;
pub use error::ApifyError;
pub use input::{ads_library_search_url, AdsLibraryInput, StartUrl};
pub use job::{
    classify, JobError, JobOrchestrator, PollPolicy, PollStep, ScrapeJob, TransportErrorPolicy,
    TERMINAL_FAILURE_STATUSES,
};
pub use runner::JobRunner;
pub use types::{RunData, RunStatus};
