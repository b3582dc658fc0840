use adlens_adlib::{AnalyzeRequest, AnalyzeResponse};
use adlens_core::Period;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ScrapeAdsBody {
    #[serde(default)]
    advertiser_name: String,
    #[serde(default)]
    period: Option<Period>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    force_refresh: bool,
}

/// `POST /api/v1/scrape-ads`: runs (or replays from cache) an advertiser
/// analysis. The status code follows the failure kind.
pub(super) async fn scrape_ads(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ScrapeAdsBody>, JsonRejection>,
) -> (StatusCode, Json<AnalyzeResponse>) {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(request_id = %req_id.0, error = %rejection, "rejected scrape-ads body");
            return (
                StatusCode::BAD_REQUEST,
                Json(AnalyzeResponse {
                    success: false,
                    data: None,
                    error: Some("Invalid request body".to_string()),
                    from_cache: None,
                }),
            );
        }
    };

    let request = AnalyzeRequest {
        period: body.period,
        country_code: body.country_code,
        limit: body.limit,
        force_refresh: body.force_refresh,
    };

    let result = state.analyzer.analyze(&body.advertiser_name, &request).await;
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(
                request_id = %req_id.0,
                advertiser = %body.advertiser_name,
                error = %err,
                "scrape-ads failed"
            );
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
    };

    (status, Json(AnalyzeResponse::from(result)))
}
