//! Field fallback chains over [`FacebookAd`].
//!
//! Each accessor returns the first non-empty candidate. Empty strings and a
//! zero reach count as absent, matching how the dashboard has always read
//! these records.

use std::borrow::Cow;

use crate::raw::{AudienceInfo, FacebookAd, LocationAudience, PageInfo, SnapshotCard};

pub const UNTITLED_AD: &str = "Untitled Ad";
pub const UNKNOWN_ADVERTISER_ID: &str = "unknown";
pub const UNKNOWN_ADVERTISER_NAME: &str = "Unknown Advertiser";

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

fn first_card(ad: &FacebookAd) -> Option<&SnapshotCard> {
    ad.snapshot.as_ref()?.cards.as_ref()?.first()
}

/// `images[0].resized_image_url`, else `cards[0].resized_image_url`.
#[must_use]
pub fn image_url(ad: &FacebookAd) -> Option<&str> {
    let from_images = ad
        .snapshot
        .as_ref()
        .and_then(|s| s.images.as_ref())
        .and_then(|images| images.first())
        .and_then(|image| non_empty(image.resized_image_url.as_ref()));

    from_images.or_else(|| first_card(ad).and_then(|c| non_empty(c.resized_image_url.as_ref())))
}

/// Video preview image and playable URL, as a pair.
///
/// Read from `videos[0]` (SD preferred over HD). When that yields no preview
/// and a first card exists, both values come from the card instead, even if
/// `videos[0]` had a playable URL.
#[must_use]
pub fn video_urls(ad: &FacebookAd) -> (Option<&str>, Option<&str>) {
    let video = ad
        .snapshot
        .as_ref()
        .and_then(|s| s.videos.as_ref())
        .and_then(|videos| videos.first());

    let preview = video.and_then(|v| non_empty(v.video_preview_image_url.as_ref()));
    let url = video.and_then(|v| {
        non_empty(v.video_sd_url.as_ref()).or_else(|| non_empty(v.video_hd_url.as_ref()))
    });

    if preview.is_none() {
        if let Some(card) = first_card(ad) {
            return (
                non_empty(card.video_preview_image_url.as_ref()),
                non_empty(card.video_sd_url.as_ref())
                    .or_else(|| non_empty(card.video_hd_url.as_ref())),
            );
        }
    }

    (preview, url)
}

#[must_use]
pub fn title(ad: &FacebookAd) -> &str {
    ad.snapshot
        .as_ref()
        .and_then(|s| non_empty(s.title.as_ref()))
        .or_else(|| non_empty(ad.page_name.as_ref()))
        .unwrap_or(UNTITLED_AD)
}

#[must_use]
pub fn body(ad: &FacebookAd) -> &str {
    ad.snapshot
        .as_ref()
        .and_then(|s| s.body.as_ref())
        .and_then(|b| non_empty(b.text.as_ref()))
        .unwrap_or("")
}

/// `ad_archive_id`, else `ad_id`, else the synthetic `ad-{index}`.
#[must_use]
pub fn ad_id(ad: &FacebookAd, index: usize) -> Cow<'_, str> {
    non_empty(ad.ad_archive_id.as_ref())
        .or_else(|| non_empty(ad.ad_id.as_ref()))
        .map_or_else(|| Cow::Owned(format!("ad-{index}")), Cow::Borrowed)
}

/// Estimated reach of this ad: `aaa_info` first, then EU transparency.
#[must_use]
pub fn reach(ad: &FacebookAd) -> Option<u64> {
    let positive = |info: Option<&AudienceInfo>| info.and_then(|i| i.eu_total_reach).filter(|r| *r > 0);
    positive(ad.aaa_info.as_ref()).or_else(|| positive(eu_transparency(ad)))
}

#[must_use]
pub fn eu_transparency(ad: &FacebookAd) -> Option<&AudienceInfo> {
    ad.transparency_by_location.as_ref()?.eu_transparency.as_ref()
}

#[must_use]
pub fn page_info(ad: &FacebookAd) -> Option<&PageInfo> {
    ad.advertiser
        .as_ref()?
        .ad_library_page_info
        .as_ref()?
        .page_info
        .as_ref()
}

#[must_use]
pub fn advertiser_id(ad: &FacebookAd) -> &str {
    page_info(ad)
        .and_then(|p| non_empty(p.page_id.as_ref()))
        .or_else(|| non_empty(ad.page_id.as_ref()))
        .unwrap_or(UNKNOWN_ADVERTISER_ID)
}

#[must_use]
pub fn advertiser_name(ad: &FacebookAd) -> &str {
    page_info(ad)
        .and_then(|p| non_empty(p.page_name.as_ref()))
        .or_else(|| non_empty(ad.page_name.as_ref()))
        .unwrap_or(UNKNOWN_ADVERTISER_NAME)
}

#[must_use]
pub fn about(ad: &FacebookAd) -> Option<&str> {
    ad.advertiser
        .as_ref()?
        .page
        .as_ref()?
        .about
        .as_ref()?
        .text
        .as_deref()
}

/// Whether this record can serve as the audience snapshot source.
#[must_use]
pub fn has_audience(ad: &FacebookAd) -> bool {
    ad.aaa_info.as_ref().is_some_and(|a| a.age_audience.is_some()) || eu_transparency(ad).is_some()
}

/// The audience container of a record: `aaa_info`, else EU transparency.
#[must_use]
pub fn audience_info(ad: &FacebookAd) -> Option<&AudienceInfo> {
    ad.aaa_info.as_ref().or_else(|| eu_transparency(ad))
}

/// Targeted locations: `aaa_info` list first (an empty list still wins),
/// then EU transparency.
#[must_use]
pub fn locations(ad: &FacebookAd) -> &[LocationAudience] {
    ad.aaa_info
        .as_ref()
        .and_then(|a| a.location_audience.as_deref())
        .or_else(|| eu_transparency(ad).and_then(|e| e.location_audience.as_deref()))
        .unwrap_or(&[])
}

#[cfg(test)]
#[path = "resolve_test.rs"]
mod tests;
