//! Record-list summaries: the advertiser profile and the audience overview.

use std::collections::HashMap;

use crate::analysis::{AgeGenderReach, CountryReach, SimpleAdvertiser, SimpleAudience};
use crate::raw::RawAdRecord;
use crate::resolve;

/// Profile from the first record; counts over all of them.
///
/// Returns `None` for an empty list.
#[must_use]
pub fn summarize_advertiser(records: &[RawAdRecord]) -> Option<SimpleAdvertiser> {
    let first = records.first()?.ad();
    let page = resolve::page_info(first);

    let active_ads = records
        .iter()
        .filter(|r| r.ad().is_active == Some(true))
        .count();

    Some(SimpleAdvertiser {
        id: resolve::advertiser_id(first).to_owned(),
        name: resolve::advertiser_name(first).to_owned(),
        category: page.and_then(|p| p.page_category.clone()),
        likes: page.and_then(|p| p.likes),
        profile_photo: page.and_then(|p| p.profile_photo.clone()),
        cover_photo: page.and_then(|p| p.page_cover_photo.clone()),
        about: resolve::about(first).map(str::to_owned),
        page_url: page.and_then(|p| p.page_profile_uri.clone()),
        verification: page.and_then(|p| p.page_verification.clone()),
        total_ads: records.len(),
        active_ads,
    })
}

/// Audience overview.
///
/// Age bounds, gender and the age/gender breakdown come from the first
/// record that carries audience data. Reach is summed over every record and
/// countries are counted over every record.
#[must_use]
pub fn summarize_audience(records: &[RawAdRecord]) -> SimpleAudience {
    let info = records
        .iter()
        .map(RawAdRecord::ad)
        .find(|ad| resolve::has_audience(ad))
        .and_then(resolve::audience_info);

    let age_gender_breakdown = info
        .and_then(|i| i.age_country_gender_reach_breakdown.as_ref())
        .and_then(|countries| countries.first())
        .and_then(|country| country.age_gender_breakdowns.as_ref())
        .map(|rows| {
            rows.iter()
                .map(|row| AgeGenderReach {
                    age_range: row.age_range.clone().unwrap_or_default(),
                    female: row.female,
                    male: row.male,
                    unknown: row.unknown,
                })
                .collect()
        });

    SimpleAudience {
        age_min: info.and_then(|i| i.age_min),
        age_max: info.and_then(|i| i.age_max),
        gender: info.and_then(|i| i.gender_audience.clone()),
        total_reach: records
            .iter()
            .map(|r| resolve::reach(r.ad()).unwrap_or(0))
            .sum(),
        countries: count_countries(records),
        age_gender_breakdown,
    }
}

/// Counts non-excluded named locations across records, first-seen order.
fn count_countries(records: &[RawAdRecord]) -> Vec<CountryReach> {
    let mut countries: Vec<CountryReach> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for location in records.iter().flat_map(|r| resolve::locations(r.ad())) {
        let Some(name) = location.name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        if location.excluded == Some(true) {
            continue;
        }
        match position.get(name) {
            Some(&idx) => countries[idx].reach += 1,
            None => {
                position.insert(name, countries.len());
                countries.push(CountryReach {
                    name: name.to_owned(),
                    reach: 1,
                });
            }
        }
    }

    countries
}
