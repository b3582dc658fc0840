use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::{sync::Mutex, time::Instant};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Per-request correlation id, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug)]
struct RateLimitWindow {
    started_at: Instant,
    admitted: usize,
}

impl RateLimitWindow {
    /// Counts one request against the window, opening a fresh window once the
    /// current one has elapsed. On rejection returns the time until reset.
    fn admit(&mut self, now: Instant, length: Duration, budget: usize) -> Result<(), Duration> {
        let elapsed = now.duration_since(self.started_at);
        if elapsed >= length {
            self.started_at = now;
            self.admitted = 0;
        } else if self.admitted >= budget {
            return Err(length - elapsed);
        }
        self.admitted += 1;
        Ok(())
    }
}

/// Fixed-window limiter shared by every route it wraps.
///
/// Scrape requests each start a paid actor run, so the window is global
/// rather than per client.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    budget: usize,
    length: Duration,
    window: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(budget: usize, length: Duration) -> Self {
        Self {
            budget,
            length,
            window: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                admitted: 0,
            })),
        }
    }

    #[must_use]
    pub fn from_config(config: &adlens_core::AppConfig) -> Self {
        Self::new(
            config.rate_limit_max_requests,
            Duration::from_secs(config.rate_limit_window_secs),
        )
    }
}

#[derive(Debug, Serialize)]
struct RateLimitedBody {
    error: RateLimitedError,
}

#[derive(Debug, Serialize)]
struct RateLimitedError {
    code: &'static str,
    message: String,
}

/// Tags the request with [`RequestId`] and mirrors it on the response.
///
/// A non-empty incoming `x-request-id` is reused; otherwise a v4 UUID is
/// minted.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = match req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some(given) if !given.is_empty() => given.to_owned(),
        _ => Uuid::new_v4().to_string(),
    };

    let header = HeaderValue::from_str(&id).ok();
    req.extensions_mut().insert(RequestId(id));

    let mut res = next.run(req).await;
    if let Some(header) = header {
        res.headers_mut().insert(REQUEST_ID_HEADER, header);
    }
    res
}

/// Rejects requests beyond the window budget with 429 and `Retry-After`.
pub async fn enforce_rate_limit(
    State(limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let admitted = limit
        .window
        .lock()
        .await
        .admit(Instant::now(), limit.length, limit.budget);

    if let Err(retry_in) = admitted {
        let retry_secs = retry_in.as_secs().max(1);
        tracing::warn!(
            budget = limit.budget,
            window_secs = limit.length.as_secs(),
            retry_secs,
            "rate limit exceeded"
        );
        let body = RateLimitedBody {
            error: RateLimitedError {
                code: "rate_limited",
                message: format!("too many scrape requests, retry in {retry_secs}s"),
            },
        };
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(RETRY_AFTER, retry_secs.to_string())],
            Json(body),
        )
            .into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, routing::get, Extension, Router};
    use tower::ServiceExt;

    use super::*;

    fn echo_router() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(id): Extension<RequestId>| async move { id.0 }),
            )
            .layer(axum::middleware::from_fn(request_id))
    }

    #[tokio::test]
    async fn request_id_is_echoed_when_provided() {
        let response = echo_router()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("x-request-id", "req-abc")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
    }

    #[tokio::test]
    async fn request_id_is_generated_when_missing() {
        let response = echo_router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        let id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .expect("generated id");
        assert!(Uuid::parse_str(id).is_ok(), "not a uuid: {id}");
    }

    #[tokio::test]
    async fn rate_limit_rejects_requests_beyond_window_budget() {
        let app = Router::new().route("/", get(|| async { "ok" })).layer(
            axum::middleware::from_fn_with_state(
                RateLimitState::new(2, Duration::from_secs(60)),
                enforce_rate_limit,
            ),
        );

        let mut statuses = Vec::new();
        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
                .await
                .expect("response");
            statuses.push(response.status());
        }

        assert_eq!(
            statuses,
            [StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn window_reports_time_until_reset_then_reopens() {
        let length = Duration::from_secs(60);
        let mut window = RateLimitWindow {
            started_at: Instant::now(),
            admitted: 0,
        };

        assert_eq!(window.admit(Instant::now(), length, 1), Ok(()));
        tokio::time::advance(Duration::from_secs(45)).await;
        assert_eq!(
            window.admit(Instant::now(), length, 1),
            Err(Duration::from_secs(15))
        );

        tokio::time::advance(Duration::from_secs(15)).await;
        assert_eq!(window.admit(Instant::now(), length, 1), Ok(()));
        assert_eq!(window.admitted, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rejection_carries_retry_after() {
        let app = Router::new().route("/", get(|| async { "ok" })).layer(
            axum::middleware::from_fn_with_state(
                RateLimitState::new(1, Duration::from_secs(30)),
                enforce_rate_limit,
            ),
        );
        let request = || Request::builder().uri("/").body(Body::empty()).expect("request");

        let first = app.clone().oneshot(request()).await.expect("response");
        assert_eq!(first.status(), StatusCode::OK);

        tokio::time::advance(Duration::from_secs(10)).await;
        let second = app.oneshot(request()).await.expect("response");
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            second.headers().get(RETRY_AFTER).and_then(|v| v.to_str().ok()),
            Some("20")
        );
    }
}
