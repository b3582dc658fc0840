use adlens_searchapi::{SearchApiError, SearchResponse, MIN_QUERY_CHARS};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
struct SearchErrorBody {
    error: &'static str,
}

fn search_error(status: StatusCode, error: &'static str) -> Response {
    (status, Json(SearchErrorBody { error })).into_response()
}

/// `GET /api/v1/search-advertisers?q=`: advertiser name suggestions.
pub(super) async fn search_advertisers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Response {
    if query.q.chars().count() < MIN_QUERY_CHARS {
        return Json(SearchResponse::default()).into_response();
    }

    let Some(client) = state.search.as_ref() else {
        return search_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "SEARCHAPI_KEY not configured",
        );
    };

    match client.search_advertisers(&query.q).await {
        Ok(found) => Json(found).into_response(),
        Err(SearchApiError::Api { status, message }) => {
            tracing::warn!(request_id = %req_id.0, status, message = %message, "advertiser search failed upstream");
            search_error(
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "Failed to search advertisers",
            )
        }
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "advertiser search failed");
            search_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
