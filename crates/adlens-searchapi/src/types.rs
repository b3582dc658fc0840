//! SearchAPI response types for the
//! `google_ads_transparency_center_advertiser_search` engine.
//!
//! Either top-level array may be missing or `null` when nothing matches;
//! both deserialize to an empty vector. Suggestions are passed through to
//! the dashboard in their wire shape, so fields keep their snake_case names.

use serde::{Deserialize, Deserializer, Serialize};

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Matched advertisers and domains for a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub advertisers: Vec<AdvertiserSuggestion>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub domains: Vec<DomainSuggestion>,
}

/// One advertiser known to the Ads Transparency Center.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvertiserSuggestion {
    pub name: String,
    /// Transparency Center advertiser id, e.g. `"AR01234567890123456789"`.
    pub id: String,
    /// Two-letter region the advertiser is registered in.
    pub region: String,
    pub ads_count: AdsCount,
    pub is_verified: bool,
}

/// Ad count bucket; the Transparency Center only reports ranges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdsCount {
    pub lower: u64,
    pub upper: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainSuggestion {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_arrays_are_empty() {
        let missing: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(missing, SearchResponse::default());

        let null: SearchResponse =
            serde_json::from_str(r#"{"advertisers": null, "domains": null}"#).unwrap();
        assert!(null.advertisers.is_empty());
        assert!(null.domains.is_empty());
    }

    #[test]
    fn advertiser_parses_with_partial_fields() {
        let parsed: SearchResponse = serde_json::from_str(
            r#"{"advertisers":[{"name":"Nike Inc","id":"AR1","ads_count":{"lower":100}}],
                "domains":[{"name":"nike.com"}],
                "search_metadata":{"id":"x"}}"#,
        )
        .unwrap();
        let nike = &parsed.advertisers[0];
        assert_eq!(nike.name, "Nike Inc");
        assert_eq!(nike.ads_count, AdsCount { lower: 100, upper: 0 });
        assert!(!nike.is_verified);
        assert_eq!(parsed.domains[0].name, "nike.com");
    }
}
