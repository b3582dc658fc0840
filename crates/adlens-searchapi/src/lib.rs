//! Advertiser name suggestions from the Google Ads Transparency Center,
//! queried through SearchAPI.

pub mod client;
pub mod error;
pub mod types;

pub use client::{SearchApiClient, MIN_QUERY_CHARS};
pub use error::SearchApiError;
pub use types::{AdsCount, AdvertiserSuggestion, DomainSuggestion, SearchResponse};
