//! The simplified view model served to the dashboard, and the builder that
//! produces it from raw records.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::{summarize_advertiser, summarize_audience};
use crate::raw::RawAdRecord;
use crate::resolve;

/// One ad, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleAd {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_preview_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub platforms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reach: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impressions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_format: Option<String>,
}

/// Advertiser profile taken from the first record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleAdvertiser {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
    pub total_ads: usize,
    pub active_ads: usize,
}

/// A targeted location and the number of ads that target it.
///
/// `reach` is an ad occurrence count, not an audience size. The field name
/// is kept for dashboard compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryReach {
    pub name: String,
    pub reach: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGenderReach {
    pub age_range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub female: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub male: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unknown: Option<u64>,
}

/// Audience summary across all records.
///
/// Age, gender and the breakdown describe a single source record; only
/// `total_reach` and `countries` aggregate over every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleAudience {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub total_reach: u64,
    pub countries: Vec<CountryReach>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_gender_breakdown: Option<Vec<AgeGenderReach>>,
}

/// The complete result for one advertiser.
///
/// Built once per scrape and never mutated; callers and the cache share it
/// through [`SharedAnalysis`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertiserAnalysis {
    pub advertiser: SimpleAdvertiser,
    pub ads: Vec<SimpleAd>,
    pub audience: SimpleAudience,
    pub raw_data: Vec<RawAdRecord>,
}

pub type SharedAnalysis = Arc<AdvertiserAnalysis>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("cannot build an analysis from zero records")]
    NoRecords,
}

/// Flattens one record. `index` is its position in the dataset.
#[must_use]
pub fn simplify_ad(record: &RawAdRecord, index: usize) -> SimpleAd {
    let ad = record.ad();
    let snapshot = ad.snapshot.as_ref();
    let (video_preview_url, video_url) = resolve::video_urls(ad);

    SimpleAd {
        id: resolve::ad_id(ad, index).into_owned(),
        title: resolve::title(ad).to_owned(),
        body: resolve::body(ad).to_owned(),
        image_url: resolve::image_url(ad).map(str::to_owned),
        video_preview_url: video_preview_url.map(str::to_owned),
        video_url: video_url.map(str::to_owned),
        is_active: ad.is_active.unwrap_or(false),
        start_date: ad.start_date_formatted.clone(),
        end_date: ad.end_date_formatted.clone(),
        platforms: ad.publisher_platform.clone().unwrap_or_default(),
        cta_text: snapshot.and_then(|s| s.cta_text.clone()),
        cta_type: snapshot.and_then(|s| s.cta_type.clone()),
        link_url: snapshot.and_then(|s| s.link_url.clone()),
        reach: resolve::reach(ad),
        impressions: ad
            .impressions_with_index
            .as_ref()
            .and_then(|i| i.impressions_text.clone()),
        display_format: snapshot.and_then(|s| s.display_format.clone()),
    }
}

/// Claims `id` in `seen`, suffixing the record index (then a counter) until
/// the result is unused.
fn unique_id(seen: &mut HashSet<String>, id: String, index: usize) -> String {
    if !seen.contains(&id) {
        seen.insert(id.clone());
        return id;
    }
    let mut candidate = format!("{id}-{index}");
    let mut attempt = 2;
    while seen.contains(&candidate) {
        candidate = format!("{id}-{index}-{attempt}");
        attempt += 1;
    }
    seen.insert(candidate.clone());
    candidate
}

/// Builds the analysis for a non-empty record list, preserving input order.
///
/// Upstream ids occasionally repeat within one dataset; a repeated id gets
/// the record index appended so ids stay unique within the result.
///
/// # Errors
///
/// Returns [`BuildError::NoRecords`] if `records` is empty.
pub fn build_analysis(records: Vec<RawAdRecord>) -> Result<AdvertiserAnalysis, BuildError> {
    let advertiser = summarize_advertiser(&records).ok_or(BuildError::NoRecords)?;
    let audience = summarize_audience(&records);

    let mut seen = HashSet::with_capacity(records.len());
    let ads = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let mut ad = simplify_ad(record, index);
            ad.id = unique_id(&mut seen, ad.id, index);
            ad
        })
        .collect();

    Ok(AdvertiserAnalysis {
        advertiser,
        ads,
        audience,
        raw_data: records,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn records(values: Vec<serde_json::Value>) -> Vec<RawAdRecord> {
        values.into_iter().map(RawAdRecord::from_value).collect()
    }

    #[test]
    fn build_rejects_empty_input() {
        assert_eq!(build_analysis(Vec::new()), Err(BuildError::NoRecords));
    }

    #[test]
    fn synthetic_ids_follow_input_order() {
        let analysis = build_analysis(records(vec![json!({}), json!({}), json!({})])).unwrap();
        let ids: Vec<_> = analysis.ads.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["ad-0", "ad-1", "ad-2"]);
    }

    #[test]
    fn repeated_upstream_ids_are_made_unique() {
        let analysis = build_analysis(records(vec![
            json!({ "ad_archive_id": "A" }),
            json!({ "ad_archive_id": "B" }),
            json!({ "ad_archive_id": "A" }),
        ]))
        .unwrap();
        let ids: Vec<_> = analysis.ads.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "A-2"]);
    }

    #[test]
    fn renamed_id_never_collides_with_an_upstream_id() {
        let analysis = build_analysis(records(vec![
            json!({ "ad_archive_id": "A-2" }),
            json!({ "ad_archive_id": "A" }),
            json!({ "ad_archive_id": "A" }),
            json!({ "ad_archive_id": "A-2" }),
            json!({ "ad_archive_id": "ad-5" }),
            json!({}),
        ]))
        .unwrap();
        let ids: Vec<_> = analysis.ads.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["A-2", "A", "A-2-2", "A-2-3", "ad-5", "ad-5-5"]);

        let distinct: HashSet<_> = ids.iter().collect();
        assert_eq!(distinct.len(), ids.len());
    }

    #[test]
    fn mistyped_nested_field_keeps_the_rest_of_the_ad() {
        let analysis = build_analysis(records(vec![json!({
            "ad_archive_id": "123",
            "is_active": true,
            "snapshot": { "title": "Spring sale" },
            "advertiser": { "ad_library_page_info": { "page_info": {
                "page_name": "Acme",
                "likes": "many"
            }}},
            "aaa_info": {
                "eu_total_reach": 500,
                "location_audience": [{ "name": "Germany", "excluded": null }]
            }
        })]))
        .unwrap();

        let ad = &analysis.ads[0];
        assert_eq!(ad.id, "123");
        assert_eq!(ad.title, "Spring sale");
        assert!(ad.is_active);
        assert_eq!(ad.reach, Some(500));
        assert_eq!(analysis.advertiser.name, "Acme");
        assert_eq!(analysis.advertiser.likes, None);
        assert_eq!(analysis.advertiser.active_ads, 1);
        assert_eq!(analysis.audience.total_reach, 500);
        assert_eq!(
            analysis.audience.countries,
            [CountryReach { name: "Germany".to_string(), reach: 1 }]
        );
    }

    #[test]
    fn simplify_maps_all_fields() {
        let record = RawAdRecord::from_value(json!({
            "ad_archive_id": "111",
            "is_active": true,
            "start_date_formatted": "2025-01-02",
            "publisher_platform": ["FACEBOOK", "MESSENGER"],
            "impressions_with_index": { "impressions_text": "1K-5K" },
            "aaa_info": { "eu_total_reach": 4200 },
            "snapshot": {
                "title": "Winter deals",
                "body": { "text": "Save big" },
                "images": [{ "resized_image_url": "https://img/w.jpg" }],
                "cta_text": "Shop now",
                "cta_type": "SHOP_NOW",
                "link_url": "https://shop.example",
                "display_format": "IMAGE"
            }
        }));

        let ad = simplify_ad(&record, 0);
        assert_eq!(ad.id, "111");
        assert_eq!(ad.title, "Winter deals");
        assert_eq!(ad.body, "Save big");
        assert_eq!(ad.image_url.as_deref(), Some("https://img/w.jpg"));
        assert!(ad.is_active);
        assert_eq!(ad.start_date.as_deref(), Some("2025-01-02"));
        assert!(ad.end_date.is_none());
        assert_eq!(ad.platforms, ["FACEBOOK", "MESSENGER"]);
        assert_eq!(ad.cta_type.as_deref(), Some("SHOP_NOW"));
        assert_eq!(ad.reach, Some(4200));
        assert_eq!(ad.impressions.as_deref(), Some("1K-5K"));
        assert_eq!(ad.display_format.as_deref(), Some("IMAGE"));
    }

    #[test]
    fn serialized_shape_is_camel_case_and_skips_absent_fields() {
        let analysis = build_analysis(records(vec![json!({ "page_name": "Acme", "extra": 1 })])).unwrap();
        let value = serde_json::to_value(&analysis).unwrap();

        assert_eq!(value["advertiser"]["name"], "Acme");
        assert_eq!(value["advertiser"]["totalAds"], 1);
        assert_eq!(value["advertiser"]["activeAds"], 0);
        assert!(value["advertiser"].get("category").is_none());
        assert_eq!(value["ads"][0]["isActive"], false);
        assert!(value["ads"][0].get("imageUrl").is_none());
        assert_eq!(value["audience"]["totalReach"], 0);
        assert_eq!(value["rawData"][0]["extra"], 1);
    }
}
