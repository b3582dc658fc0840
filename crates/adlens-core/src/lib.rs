pub mod app_config;
pub mod config;
pub mod options;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use options::{
    Period, ScrapeOptions, DEFAULT_ACTOR_ID, DEFAULT_APIFY_BASE_URL, DEFAULT_COUNTRY_CODE,
    DEFAULT_LIMIT, DEFAULT_LIMIT_PER_SOURCE, DEFAULT_POLL_CEILING_SECS, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SEARCHAPI_BASE_URL, DEFAULT_SEARCHAPI_REGION,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
