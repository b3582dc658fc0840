//! `analyze` command: one uncached scrape, printed as a summary or JSON.

use std::{fmt::Write as _, sync::Arc};

use adlens_adlib::{AdvertiserAnalysis, AnalyzeRequest, Analyzer, NoCache};
use adlens_apify::{ApifyClient, JobOrchestrator, PollPolicy};
use adlens_core::{AppConfig, Period};

/// Number of ads listed in the text summary.
const SUMMARY_AD_ROWS: usize = 10;
const SUMMARY_COUNTRY_ROWS: usize = 5;
const TITLE_WIDTH: usize = 50;

#[derive(Debug, Clone, Default)]
pub(crate) struct AnalyzeArgs {
    pub(crate) period: Option<Period>,
    pub(crate) country: Option<String>,
    pub(crate) limit: Option<u32>,
    pub(crate) json: bool,
}

impl AnalyzeArgs {
    fn to_request(&self) -> AnalyzeRequest {
        AnalyzeRequest {
            period: self.period,
            country_code: self.country.clone(),
            limit: self.limit,
            force_refresh: false,
        }
    }
}

/// Run one scrape for `name` and print the result to stdout.
///
/// Ctrl-C while the scraper is still running cancels the wait.
///
/// # Errors
///
/// Returns an error if the Apify client cannot be built or the analysis
/// fails for any reason, including an empty result.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    name: &str,
    args: &AnalyzeArgs,
) -> anyhow::Result<()> {
    let client = ApifyClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build Apify client: {e}"))?;
    let orchestrator = JobOrchestrator::new(Arc::new(client), PollPolicy::from_config(config));
    let analyzer = Analyzer::new(orchestrator, Arc::new(NoCache), config.default_scrape.clone());

    let analyzed = analyzer
        .analyze_until(name, &args.to_request(), interrupted())
        .await
        .map_err(|e| anyhow::anyhow!("analysis of '{}' failed: {e}", name.trim()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&*analyzed.analysis)?);
    } else {
        print!("{}", render_summary(&analyzed.analysis));
    }
    Ok(())
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable; run cannot be cancelled");
        std::future::pending::<()>().await;
    }
    tracing::info!("interrupted, abandoning scraper run");
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width).collect::<String>())
    } else {
        text.to_owned()
    }
}

/// Plain-text report: advertiser header, audience, then the first ads.
pub(crate) fn render_summary(analysis: &AdvertiserAnalysis) -> String {
    let advertiser = &analysis.advertiser;
    let audience = &analysis.audience;
    let mut out = String::new();

    let _ = writeln!(out, "Advertiser: {} ({})", advertiser.name, advertiser.id);
    if let Some(category) = &advertiser.category {
        let _ = writeln!(out, "Category: {category}");
    }
    if let Some(likes) = advertiser.likes {
        let _ = writeln!(out, "Likes: {likes}");
    }
    let _ = writeln!(
        out,
        "Ads: {} total, {} active",
        advertiser.total_ads, advertiser.active_ads
    );
    let _ = writeln!(out, "Total reach: {}", audience.total_reach);
    if let (Some(min), Some(max)) = (audience.age_min, audience.age_max) {
        let _ = writeln!(out, "Ages: {min}-{max}");
    }
    if let Some(gender) = &audience.gender {
        let _ = writeln!(out, "Gender: {gender}");
    }
    if !audience.countries.is_empty() {
        let top: Vec<String> = audience
            .countries
            .iter()
            .take(SUMMARY_COUNTRY_ROWS)
            .map(|c| format!("{} ({})", c.name, c.reach))
            .collect();
        let _ = writeln!(out, "Countries: {}", top.join(", "));
    }

    out.push('\n');
    let _ = writeln!(out, "{:<24}{:<8}{:<12}TITLE", "ID", "ACTIVE", "REACH");
    for ad in analysis.ads.iter().take(SUMMARY_AD_ROWS) {
        let reach = ad.reach.map_or_else(|| "-".to_string(), |r| r.to_string());
        let active = if ad.is_active { "yes" } else { "no" };
        let _ = writeln!(
            out,
            "{:<24}{:<8}{:<12}{}",
            ad.id,
            active,
            reach,
            truncate(&ad.title, TITLE_WIDTH)
        );
    }
    if analysis.ads.len() > SUMMARY_AD_ROWS {
        let _ = writeln!(
            out,
            "... and {} more (use --json for all)",
            analysis.ads.len() - SUMMARY_AD_ROWS
        );
    }

    out
}
