//! Scrape options and the named defaults shared by the orchestrator,
//! the HTTP surface, and the CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Apify REST API root.
pub const DEFAULT_APIFY_BASE_URL: &str = "https://api.apify.com/v2";

/// Actor id for the Facebook Ads Library scraper.
pub const DEFAULT_ACTOR_ID: &str = "curious_coder~facebook-ads-library-scraper";

/// Delay between two run-status checks.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Wall-clock ceiling for the whole poll loop.
pub const DEFAULT_POLL_CEILING_SECS: u64 = 5 * 60;

/// Maximum number of ads requested from the actor.
pub const DEFAULT_LIMIT: u32 = 100;

/// Per-source cap passed through to the actor input.
pub const DEFAULT_LIMIT_PER_SOURCE: u32 = 100;

/// Per-request timeout for Apify and SearchAPI calls.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_SEARCHAPI_BASE_URL: &str = "https://www.searchapi.io";

/// Region advertiser suggestions are scoped to.
pub const DEFAULT_SEARCHAPI_REGION: &str = "DE";

/// Country filter meaning "no filter".
pub const DEFAULT_COUNTRY_CODE: &str = "ALL";

/// Time window of the ad library search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "last24h")]
    Last24h,
    #[serde(rename = "last7d")]
    Last7d,
    #[default]
    #[serde(rename = "last30d")]
    Last30d,
    #[serde(rename = "last90d")]
    Last90d,
    #[serde(rename = "all")]
    All,
}

impl Period {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Last24h => "last24h",
            Period::Last7d => "last7d",
            Period::Last30d => "last30d",
            Period::Last90d => "last90d",
            Period::All => "all",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last24h" => Ok(Period::Last24h),
            "last7d" => Ok(Period::Last7d),
            "last30d" => Ok(Period::Last30d),
            "last90d" => Ok(Period::Last90d),
            "all" => Ok(Period::All),
            other => Err(ConfigError::InvalidEnvVar {
                var: "period".to_string(),
                reason: format!("unknown period '{other}'"),
            }),
        }
    }
}

/// Filters forwarded to the scraping job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOptions {
    pub period: Period,
    pub country_code: String,
    pub limit: u32,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            period: Period::default(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ScrapeOptions {
    /// Fills unset request fields from `defaults`.
    #[must_use]
    pub fn merged(
        defaults: &ScrapeOptions,
        period: Option<Period>,
        country_code: Option<&str>,
        limit: Option<u32>,
    ) -> Self {
        Self {
            period: period.unwrap_or(defaults.period),
            country_code: country_code
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map_or_else(|| defaults.country_code.clone(), str::to_uppercase),
            limit: limit.filter(|l| *l > 0).unwrap_or(defaults.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_named_constants() {
        let opts = ScrapeOptions::default();
        assert_eq!(opts.period, Period::Last30d);
        assert_eq!(opts.country_code, DEFAULT_COUNTRY_CODE);
        assert_eq!(opts.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn period_parses_every_wire_value() {
        for p in [
            Period::Last24h,
            Period::Last7d,
            Period::Last30d,
            Period::Last90d,
            Period::All,
        ] {
            assert_eq!(p.as_str().parse::<Period>().unwrap(), p);
        }
        assert!("yesterday".parse::<Period>().is_err());
    }

    #[test]
    fn period_serializes_as_wire_value() {
        let json = serde_json::to_string(&Period::Last90d).unwrap();
        assert_eq!(json, "\"last90d\"");
    }

    #[test]
    fn merged_prefers_request_values() {
        let defaults = ScrapeOptions::default();
        let opts = ScrapeOptions::merged(&defaults, Some(Period::All), Some(" de "), Some(25));
        assert_eq!(opts.period, Period::All);
        assert_eq!(opts.country_code, "DE");
        assert_eq!(opts.limit, 25);
    }

    #[test]
    fn merged_falls_back_on_blank_or_zero() {
        let defaults = ScrapeOptions::default();
        let opts = ScrapeOptions::merged(&defaults, None, Some("  "), Some(0));
        assert_eq!(opts, defaults);
    }
}
