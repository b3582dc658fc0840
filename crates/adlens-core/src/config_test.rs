use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("APIFY_API_TOKEN", "apify_api_test_token");
    m
}

#[test]
fn environment_names_parse_and_others_are_rejected() {
    for (raw, expected) in [
        ("development", Environment::Development),
        ("test", Environment::Test),
        ("production", Environment::Production),
    ] {
        assert_eq!(parse_environment(raw).ok(), Some(expected), "{raw}");
    }

    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "ADLENS_ENV"));
}

#[test]
fn build_app_config_fails_without_apify_token() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "APIFY_API_TOKEN"),
        "expected MissingEnvVar(APIFY_API_TOKEN), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_token_as_missing() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("APIFY_API_TOKEN", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "APIFY_API_TOKEN"),
        "expected MissingEnvVar(APIFY_API_TOKEN), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("ADLENS_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADLENS_BIND_ADDR"),
        "expected InvalidEnvVar(ADLENS_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.apify_api_token, "apify_api_test_token");
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.apify_base_url, "https://api.apify.com/v2");
    assert_eq!(cfg.apify_actor_id, "curious_coder~facebook-ads-library-scraper");
    assert_eq!(cfg.apify_request_timeout_secs, 30);
    assert_eq!(cfg.poll_interval_secs, 5);
    assert_eq!(cfg.poll_ceiling_secs, 300);
    assert_eq!(cfg.default_scrape.period, Period::Last30d);
    assert_eq!(cfg.default_scrape.country_code, "ALL");
    assert_eq!(cfg.default_scrape.limit, 100);
    assert_eq!(cfg.cache_capacity, 256);
    assert_eq!(cfg.cache_ttl_secs, 3600);
    assert!(cfg.searchapi_key.is_none());
    assert_eq!(cfg.searchapi_region, "DE");
    assert_eq!(cfg.rate_limit_max_requests, 30);
    assert_eq!(cfg.rate_limit_window_secs, 60);
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = full_env();
    map.insert("SEARCHAPI_KEY", "searchapi-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("apify_api_test_token"));
    assert!(!debug.contains("searchapi-secret"));
    assert!(debug.contains("[redacted]"));
}

#[test]
fn poll_interval_override() {
    let mut map = full_env();
    map.insert("ADLENS_POLL_INTERVAL_SECS", "2");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.poll_interval_secs, 2);
}

#[test]
fn poll_interval_zero_is_rejected() {
    let mut map = full_env();
    map.insert("ADLENS_POLL_INTERVAL_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADLENS_POLL_INTERVAL_SECS"),
        "expected InvalidEnvVar(ADLENS_POLL_INTERVAL_SECS), got: {result:?}"
    );
}

#[test]
fn poll_ceiling_invalid() {
    let mut map = full_env();
    map.insert("ADLENS_POLL_CEILING_SECS", "five minutes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADLENS_POLL_CEILING_SECS"),
        "expected InvalidEnvVar(ADLENS_POLL_CEILING_SECS), got: {result:?}"
    );
}

#[test]
fn default_period_override() {
    let mut map = full_env();
    map.insert("ADLENS_DEFAULT_PERIOD", "last7d");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.default_scrape.period, Period::Last7d);
}

#[test]
fn default_period_invalid() {
    let mut map = full_env();
    map.insert("ADLENS_DEFAULT_PERIOD", "fortnight");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADLENS_DEFAULT_PERIOD"),
        "expected InvalidEnvVar(ADLENS_DEFAULT_PERIOD), got: {result:?}"
    );
}

#[test]
fn default_limit_invalid() {
    let mut map = full_env();
    map.insert("ADLENS_DEFAULT_LIMIT", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADLENS_DEFAULT_LIMIT"),
        "expected InvalidEnvVar(ADLENS_DEFAULT_LIMIT), got: {result:?}"
    );
}

#[test]
fn searchapi_key_empty_is_none() {
    let mut map = full_env();
    map.insert("SEARCHAPI_KEY", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.searchapi_key.is_none());
}

#[test]
fn cache_capacity_override() {
    let mut map = full_env();
    map.insert("ADLENS_CACHE_CAPACITY", "16");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.cache_capacity, 16);
}
