//! Actor input for the Facebook Ads Library scraper.

use adlens_core::{Period, ScrapeOptions, DEFAULT_LIMIT_PER_SOURCE};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

const ADS_LIBRARY_URL: &str = "https://www.facebook.com/ads/library/";

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A start URL entry for actor input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartUrl {
    pub url: String,
}

/// Input for the `curious_coder~facebook-ads-library-scraper` actor.
#[derive(Debug, Clone, Serialize)]
pub struct AdsLibraryInput {
    pub count: u32,
    #[serde(rename = "limitPerSource")]
    pub limit_per_source: u32,
    pub period: Period,
    #[serde(rename = "scrapeAdDetails")]
    pub scrape_ad_details: bool,
    #[serde(rename = "scrapePageAds.activeStatus")]
    pub active_status: String,
    #[serde(rename = "scrapePageAds.countryCode")]
    pub country_code: String,
    pub urls: Vec<StartUrl>,
}

impl AdsLibraryInput {
    /// Builds the actor input for a keyword search on `advertiser_name`.
    #[must_use]
    pub fn for_advertiser(advertiser_name: &str, options: &ScrapeOptions) -> Self {
        Self {
            count: options.limit,
            limit_per_source: DEFAULT_LIMIT_PER_SOURCE,
            period: options.period,
            scrape_ad_details: true,
            active_status: "all".to_string(),
            country_code: options.country_code.clone(),
            urls: vec![StartUrl {
                url: ads_library_search_url(advertiser_name, &options.country_code),
            }],
        }
    }
}

/// Builds the public Ads Library keyword search URL for an advertiser.
///
/// The name is trimmed and encoded the way browsers encode a URI component
/// (spaces become `%20`, not `+`).
#[must_use]
pub fn ads_library_search_url(advertiser_name: &str, country_code: &str) -> String {
    let query = utf8_percent_encode(advertiser_name.trim(), URI_COMPONENT);
    let country = utf8_percent_encode(country_code, URI_COMPONENT);
    format!(
        "{ADS_LIBRARY_URL}?active_status=all&ad_type=all&country={country}\
         &is_targeted_country=false&media_type=all&q={query}&search_type=keyword_unordered"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_encodes_like_uri_component() {
        let url = ads_library_search_url("  Ben & Jerry's  ", "ALL");
        assert_eq!(
            url,
            "https://www.facebook.com/ads/library/?active_status=all&ad_type=all&country=ALL\
             &is_targeted_country=false&media_type=all&q=Ben%20%26%20Jerry's&search_type=keyword_unordered"
        );
    }

    #[test]
    fn search_url_encodes_non_ascii() {
        let url = ads_library_search_url("Müller", "DE");
        assert!(url.contains("q=M%C3%BCller"), "got {url}");
        assert!(url.contains("country=DE"));
    }

    #[test]
    fn input_serializes_with_actor_field_names() {
        let options = ScrapeOptions {
            period: Period::Last7d,
            country_code: "DE".to_string(),
            limit: 40,
        };
        let input = AdsLibraryInput::for_advertiser("Nike", &options);
        let json = serde_json::to_value(&input).unwrap();

        assert_eq!(json["count"], 40);
        assert_eq!(json["limitPerSource"], 100);
        assert_eq!(json["period"], "last7d");
        assert_eq!(json["scrapeAdDetails"], true);
        assert_eq!(json["scrapePageAds.activeStatus"], "all");
        assert_eq!(json["scrapePageAds.countryCode"], "DE");
        let url = json["urls"][0]["url"].as_str().unwrap();
        assert!(url.contains("q=Nike"));
        assert!(url.contains("country=DE"));
    }
}
