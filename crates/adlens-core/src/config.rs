use crate::app_config::{AppConfig, Environment};
use crate::options::{
    Period, ScrapeOptions, DEFAULT_ACTOR_ID, DEFAULT_APIFY_BASE_URL, DEFAULT_COUNTRY_CODE,
    DEFAULT_LIMIT, DEFAULT_POLL_CEILING_SECS, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SEARCHAPI_BASE_URL, DEFAULT_SEARCHAPI_REGION,
};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the process environment so tests
/// can drive them with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        let raw = or_default(var, &default.to_string());
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        let raw = or_default(var, &default.to_string());
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        let raw = or_default(var, &default.to_string());
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let apify_api_token = require("APIFY_API_TOKEN")?;

    let env = parse_environment(&or_default("ADLENS_ENV", "development"))?;
    let bind_addr = parse_addr("ADLENS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("ADLENS_LOG_LEVEL", "info");

    let apify_base_url = or_default("ADLENS_APIFY_BASE_URL", DEFAULT_APIFY_BASE_URL);
    let apify_actor_id = or_default("ADLENS_APIFY_ACTOR_ID", DEFAULT_ACTOR_ID);
    let apify_request_timeout_secs =
        parse_u64("ADLENS_APIFY_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

    let poll_interval_secs = parse_u64("ADLENS_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
    let poll_ceiling_secs = parse_u64("ADLENS_POLL_CEILING_SECS", DEFAULT_POLL_CEILING_SECS)?;
    if poll_interval_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ADLENS_POLL_INTERVAL_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let default_limit = parse_u32("ADLENS_DEFAULT_LIMIT", DEFAULT_LIMIT)?;
    let default_period = or_default("ADLENS_DEFAULT_PERIOD", Period::default().as_str())
        .parse::<Period>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "ADLENS_DEFAULT_PERIOD".to_string(),
            reason: e.to_string(),
        })?;
    let default_country = or_default("ADLENS_DEFAULT_COUNTRY", DEFAULT_COUNTRY_CODE);

    let cache_capacity = parse_usize("ADLENS_CACHE_CAPACITY", 256)?;
    let cache_ttl_secs = parse_u64("ADLENS_CACHE_TTL_SECS", 3600)?;

    let searchapi_key = lookup("SEARCHAPI_KEY").ok().filter(|k| !k.is_empty());
    let searchapi_base_url = or_default("ADLENS_SEARCHAPI_BASE_URL", DEFAULT_SEARCHAPI_BASE_URL);
    let searchapi_region = or_default("ADLENS_SEARCHAPI_REGION", DEFAULT_SEARCHAPI_REGION);

    let rate_limit_max_requests = parse_usize("ADLENS_RATE_LIMIT_MAX_REQUESTS", 30)?;
    let rate_limit_window_secs = parse_u64("ADLENS_RATE_LIMIT_WINDOW_SECS", 60)?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        apify_api_token,
        apify_base_url,
        apify_actor_id,
        apify_request_timeout_secs,
        poll_interval_secs,
        poll_ceiling_secs,
        default_scrape: ScrapeOptions {
            period: default_period,
            country_code: default_country,
            limit: default_limit,
        },
        cache_capacity,
        cache_ttl_secs,
        searchapi_key,
        searchapi_base_url,
        searchapi_region,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ADLENS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
