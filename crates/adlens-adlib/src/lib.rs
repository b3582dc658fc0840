//! Ads Library normalization: raw scraper records in, dashboard view model
//! out, plus the cached `analyze` pipeline that ties scraping to building.

pub mod aggregate;
pub mod analysis;
pub mod cache;
pub mod pipeline;
pub mod raw;
pub mod resolve;

pub use aggregate::{summarize_advertiser, summarize_audience};
pub use analysis::{
    build_analysis, simplify_ad, AdvertiserAnalysis, AgeGenderReach, BuildError, CountryReach,
    SharedAnalysis, SimpleAd, SimpleAdvertiser, SimpleAudience,
};
pub use cache::{cache_key, AnalysisCache, CacheError, MemoryAnalysisCache, NoCache};
pub use pipeline::{AnalyzeError, AnalyzeRequest, AnalyzeResponse, Analyzed, Analyzer};
pub use raw::{FacebookAd, RawAdRecord};
