//! Raw Ads Library records as returned by the scraper actor's dataset.
//!
//! ## Observed shape
//!
//! Every field is optional. Records from the same dataset disagree on which
//! groups are present: ads shown in the EU usually carry
//! `transparency_by_location.eu_transparency`, ads with "about this ad"
//! disclosures carry `aaa_info`, and many carry neither. Both audience
//! containers share the [`AudienceInfo`] shape.
//!
//! Only the fields normalization reads are modelled. The full JSON object is
//! kept alongside the typed view so that `rawData` re-serializes exactly as
//! received, unknown fields included.
//!
//! ### Nulls
//! The actor emits explicit `null` for missing groups as often as it omits
//! them, so collections are `Option<Vec<_>>` rather than `#[serde(default)]`
//! vectors.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One dataset item: a typed view over the fields normalization reads, plus
/// the untouched JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAdRecord {
    ad: FacebookAd,
    raw: Value,
}

impl RawAdRecord {
    /// Wraps a dataset item.
    ///
    /// Never fails. A known field carrying an unexpected JSON type reads as
    /// absent without affecting its siblings; an item that is not an object
    /// at all gets an empty typed view. The raw JSON is preserved verbatim
    /// either way.
    #[must_use]
    pub fn from_value(raw: Value) -> Self {
        let ad = match FacebookAd::deserialize(&raw) {
            Ok(ad) => ad,
            Err(e) => {
                let kind = json_kind(&raw);
                tracing::warn!(error = %e, kind, "dataset item is not an object; keeping raw data only");
                FacebookAd::default()
            }
        };
        Self { ad, raw }
    }

    #[must_use]
    pub fn ad(&self) -> &FacebookAd {
        &self.ad
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl From<Value> for RawAdRecord {
    fn from(raw: Value) -> Self {
        Self::from_value(raw)
    }
}

impl Serialize for RawAdRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawAdRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads a field as `T`, or `None` when it is null or has another shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Reads an array, dropping elements that are not `T`. A non-array is `None`.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| T::deserialize(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// Counts are integers, but exports sometimes render them as `1.5e3`.
/// Integral floats are accepted; anything else reads as absent.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Number(n) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    }))
}

/// Ids arrive as strings, occasionally as bare numbers.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Typed view of one Ads Library entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FacebookAd {
    /// Ads Library archive id, the stable public identifier.
    #[serde(default, deserialize_with = "lenient_id")]
    pub ad_archive_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub ad_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub page_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub page_name: Option<String>,

    /// `true` while the ad is still being delivered.
    #[serde(default, deserialize_with = "lenient")]
    pub is_active: Option<bool>,
    /// Human-readable start date, e.g. `"2025-03-14"`.
    #[serde(default, deserialize_with = "lenient")]
    pub start_date_formatted: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub end_date_formatted: Option<String>,

    /// Placements in display order, e.g. `["FACEBOOK", "INSTAGRAM"]`.
    #[serde(default, deserialize_with = "lenient_list")]
    pub publisher_platform: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub impressions_with_index: Option<Impressions>,

    #[serde(default, deserialize_with = "lenient")]
    pub snapshot: Option<AdSnapshot>,
    #[serde(default, deserialize_with = "lenient")]
    pub advertiser: Option<Advertiser>,

    /// "About this ad" audience disclosure.
    #[serde(default, deserialize_with = "lenient")]
    pub aaa_info: Option<AudienceInfo>,
    #[serde(default, deserialize_with = "lenient")]
    pub transparency_by_location: Option<TransparencyByLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Impressions {
    /// Bucketed impressions label, e.g. `"10K-15K"`.
    #[serde(default, deserialize_with = "lenient")]
    pub impressions_text: Option<String>,
}

/// Creative content of the ad.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdSnapshot {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<SnapshotBody>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub images: Option<Vec<SnapshotImage>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub videos: Option<Vec<SnapshotVideo>>,
    /// Carousel cards. Single-creative ads sometimes carry their only media
    /// here instead of in `images`/`videos`.
    #[serde(default, deserialize_with = "lenient_list")]
    pub cards: Option<Vec<SnapshotCard>>,
    #[serde(default, deserialize_with = "lenient")]
    pub cta_text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub cta_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub link_url: Option<String>,
    /// `"IMAGE"`, `"VIDEO"`, `"DCO"`, `"CAROUSEL"` and others.
    #[serde(default, deserialize_with = "lenient")]
    pub display_format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SnapshotBody {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SnapshotImage {
    #[serde(default, deserialize_with = "lenient")]
    pub resized_image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub original_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SnapshotVideo {
    #[serde(default, deserialize_with = "lenient")]
    pub video_preview_image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub video_sd_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub video_hd_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SnapshotCard {
    #[serde(default, deserialize_with = "lenient")]
    pub resized_image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub video_preview_image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub video_sd_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub video_hd_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Advertiser {
    #[serde(default, deserialize_with = "lenient")]
    pub ad_library_page_info: Option<AdLibraryPageInfo>,
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<AdvertiserPage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdLibraryPageInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub page_info: Option<PageInfo>,
}

/// Facebook page profile of the advertiser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageInfo {
    #[serde(default, deserialize_with = "lenient_id")]
    pub page_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub page_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub page_category: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub profile_photo: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub page_cover_photo: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub page_profile_uri: Option<String>,
    /// `"BLUE_VERIFIED"`, `"NOT_VERIFIED"` and similar.
    #[serde(default, deserialize_with = "lenient")]
    pub page_verification: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdvertiserPage {
    #[serde(default, deserialize_with = "lenient")]
    pub about: Option<PageAbout>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageAbout {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransparencyByLocation {
    #[serde(default, deserialize_with = "lenient")]
    pub eu_transparency: Option<AudienceInfo>,
}

/// Audience disclosure; shared by `aaa_info` and `eu_transparency`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AudienceInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub age_min: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub age_max: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub age_audience: Option<AgeAudience>,
    /// `"All"`, `"Women"`, `"Men"`.
    #[serde(default, deserialize_with = "lenient")]
    pub gender_audience: Option<String>,
    /// Estimated EU reach of this single ad.
    #[serde(default, deserialize_with = "lenient_count")]
    pub eu_total_reach: Option<u64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub location_audience: Option<Vec<LocationAudience>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub age_country_gender_reach_breakdown: Option<Vec<CountryBreakdown>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AgeAudience {
    #[serde(default, deserialize_with = "lenient")]
    pub min: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub max: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocationAudience {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// `null` and absent both mean "not excluded".
    #[serde(default, deserialize_with = "lenient")]
    pub excluded: Option<bool>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CountryBreakdown {
    #[serde(default, deserialize_with = "lenient")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub age_gender_breakdowns: Option<Vec<AgeGenderBreakdown>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AgeGenderBreakdown {
    /// Bucket label, e.g. `"25-34"` or `"65+"`.
    #[serde(default, deserialize_with = "lenient")]
    pub age_range: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub female: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub male: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub unknown: Option<u64>,
}
