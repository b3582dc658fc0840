use adlens_adlib::{build_analysis, RawAdRecord};
use adlens_searchapi::{AdsCount, AdvertiserSuggestion, DomainSuggestion, SearchResponse};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

#[test]
fn parses_analyze_with_defaults() {
    let cli = Cli::try_parse_from(["adlens-cli", "analyze", "Acme"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Analyze {
            ref name,
            period: None,
            country: None,
            limit: None,
            json: false,
        } if name == "Acme"
    ));
}

#[test]
fn parses_analyze_with_all_flags() {
    let cli = Cli::try_parse_from([
        "adlens-cli",
        "analyze",
        "Acme GmbH",
        "--period",
        "last7d",
        "--country",
        "de",
        "--limit",
        "25",
        "--json",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Analyze {
            period: Some(Period::Last7d),
            country: Some(ref c),
            limit: Some(25),
            json: true,
            ..
        } if c == "de"
    ));
}

#[test]
fn rejects_unknown_period() {
    let result = Cli::try_parse_from(["adlens-cli", "analyze", "Acme", "--period", "yesterday"]);
    assert!(result.is_err());
}

#[test]
fn analyze_requires_a_name() {
    assert!(Cli::try_parse_from(["adlens-cli", "analyze"]).is_err());
}

#[test]
fn parses_suggest_command_with_explicit_search_settings() {
    let cli = Cli::try_parse_from([
        "adlens-cli",
        "suggest",
        "acme",
        "--api-key",
        "sk-test",
        "--region",
        "FR",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Suggest { query, search } => {
            assert_eq!(query, "acme");
            assert_eq!(search.api_key, "sk-test");
            assert_eq!(search.region, "FR");
        }
        other => panic!("expected suggest, got {other:?}"),
    }
}

#[tokio::test]
async fn suggest_needs_only_searchapi_settings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("q", "acme"))
        .and(query_param("api_key", "sk-test"))
        .and(query_param("region", "DE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "advertisers": [{
                "name": "Acme GmbH",
                "id": "AR123",
                "region": "DE",
                "ads_count": { "lower": 10, "upper": 20 },
                "is_verified": false
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let args = suggest::SearchArgs {
        api_key: "sk-test".to_string(),
        region: "DE".to_string(),
        base_url: server.uri(),
    };
    let out = suggest::run_suggest(&args, "acme")
        .await
        .expect("suggest should not need Apify configuration");

    assert_eq!(out, "Acme GmbH  DE  AR123 ads 10-20\n");
}

#[tokio::test]
async fn suggest_rejects_short_queries_before_any_request() {
    let args = suggest::SearchArgs {
        api_key: "sk-test".to_string(),
        region: "DE".to_string(),
        base_url: "http://127.0.0.1:9".to_string(),
    };
    let err = suggest::run_suggest(&args, "a").await.unwrap_err();
    assert!(err.to_string().contains("at least 2 characters"));
}

#[test]
fn summary_lists_advertiser_audience_and_ads() {
    let records = vec![
        RawAdRecord::from(json!({
            "ad_archive_id": "1001",
            "is_active": true,
            "page_name": "Acme",
            "page_id": "55",
            "snapshot": { "title": "Spring sale on every single item in the store this week only" },
            "aaa_info": {
                "eu_total_reach": 1200,
                "age_min": 18,
                "age_max": 65,
                "age_audience": { "min": 18, "max": 65 },
                "location_audience": [{ "name": "Germany", "excluded": false }]
            }
        })),
        RawAdRecord::from(json!({ "ad_archive_id": "1002", "page_name": "Acme" })),
    ];
    let analysis = build_analysis(records).expect("non-empty records");

    let summary = analyze::render_summary(&analysis);

    assert!(summary.starts_with("Advertiser: Acme (55)\n"));
    assert!(summary.contains("Ads: 2 total, 1 active\n"));
    assert!(summary.contains("Total reach: 1200\n"));
    assert!(summary.contains("Ages: 18-65\n"));
    assert!(summary.contains("Countries: Germany (1)\n"));
    assert!(summary.contains("Spring sale on every single item in the store this..."));
    assert!(summary.contains("1002"));
    assert!(!summary.contains("more (use --json for all)"));
}

#[test]
fn summary_truncates_long_ad_lists() {
    let records = (0..12)
        .map(|i| RawAdRecord::from(json!({ "ad_archive_id": format!("id-{i}") })))
        .collect();
    let analysis = build_analysis(records).expect("non-empty records");

    let summary = analyze::render_summary(&analysis);

    assert!(summary.contains("id-9"));
    assert!(!summary.contains("id-10"));
    assert!(summary.contains("... and 2 more (use --json for all)"));
}

#[test]
fn suggestions_render_one_line_each() {
    let found = SearchResponse {
        advertisers: vec![AdvertiserSuggestion {
            name: "Acme GmbH".to_string(),
            id: "AR123".to_string(),
            region: "DE".to_string(),
            ads_count: AdsCount { lower: 10, upper: 20 },
            is_verified: true,
        }],
        domains: vec![DomainSuggestion {
            name: "acme.de".to_string(),
        }],
    };

    assert_eq!(
        suggest::render_suggestions(&found),
        "Acme GmbH [verified]  DE  AR123 ads 10-20\ndomain: acme.de\n"
    );
}

#[test]
fn empty_suggestions_say_so() {
    assert_eq!(
        suggest::render_suggestions(&SearchResponse::default()),
        "no suggestions\n"
    );
}
