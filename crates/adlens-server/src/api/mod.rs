mod scrape;
mod search;

use std::sync::Arc;

use adlens_adlib::Analyzer;
use adlens_searchapi::SearchApiClient;
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, RateLimitState, RequestId, REQUEST_ID_HEADER,
};

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    /// `None` when `SEARCHAPI_KEY` is not configured.
    pub search: Option<Arc<SearchApiClient>>,
}

/// Envelope for the JSON endpoints this service owns.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    fn for_request(req_id: RequestId) -> Self {
        Self {
            request_id: req_id.0,
            timestamp: Utc::now(),
        }
    }
}

/// Error envelope; `status` picks the HTTP status and is not serialized.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        req_id: RequestId,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            error: ErrorBody {
                code,
                message: message.into(),
            },
            meta: ResponseMeta::for_request(req_id),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, REQUEST_ID_HEADER])
        .expose_headers([REQUEST_ID_HEADER, header::RETRY_AFTER])
}

/// Routes that reach paid upstream APIs sit behind the rate limit.
fn limited_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/scrape-ads", post(scrape::scrape_ads))
        .route(
            "/api/v1/search-advertisers",
            get(search::search_advertisers),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(limited_router(rate_limit))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> Json<ApiResponse<HealthData>> {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::for_request(req_id),
    })
}

async fn not_found(
    Extension(req_id): Extension<RequestId>,
    uri: axum::http::Uri,
) -> ApiError {
    ApiError::new(
        StatusCode::NOT_FOUND,
        req_id,
        "not_found",
        format!("no route for {}", uri.path()),
    )
}
