use std::net::SocketAddr;

use crate::options::ScrapeOptions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub apify_api_token: String,
    pub apify_base_url: String,
    pub apify_actor_id: String,
    pub apify_request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub poll_ceiling_secs: u64,
    pub default_scrape: ScrapeOptions,
    pub cache_capacity: usize,
    pub cache_ttl_secs: u64,
    pub searchapi_key: Option<String>,
    pub searchapi_base_url: String,
    pub searchapi_region: String,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("apify_api_token", &"[redacted]")
            .field("apify_base_url", &self.apify_base_url)
            .field("apify_actor_id", &self.apify_actor_id)
            .field(
                "apify_request_timeout_secs",
                &self.apify_request_timeout_secs,
            )
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("poll_ceiling_secs", &self.poll_ceiling_secs)
            .field("default_scrape", &self.default_scrape)
            .field("cache_capacity", &self.cache_capacity)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field(
                "searchapi_key",
                &self.searchapi_key.as_ref().map(|_| "[redacted]"),
            )
            .field("searchapi_base_url", &self.searchapi_base_url)
            .field("searchapi_region", &self.searchapi_region)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .finish()
    }
}
