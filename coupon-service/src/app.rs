use std::sync::Arc;
use std::time::Duration;

use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::handlers::validate_coupon;
use crate::metrics::CouponMetrics;
use crate::provider::RuleProvider;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn RuleProvider>,
    pub metrics: CouponMetrics,
}

pub async fn health() -> &'static str {
    "ok"
}

async fn metrics(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Response {
    state.metrics.render().unwrap_or_else(|e| {
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        )
            .into_response()
    })
}

pub async fn http_error_metrics(
    axum::extract::State(state): axum::extract::State<AppState>,
    req: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> Response {
    let resp = next.run(req).await;
    let status = resp.status();
    if status.as_u16() >= 400 {
        let code = resp
            .headers()
            .get("X-Error-Code")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        state.metrics.record_http_error(code, status.as_str());
    }
    resp
}

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86_400));

    Router::new()
        .route("/healthz", get(health))
        .route("/validate-coupon", post(validate_coupon))
        .route("/metrics", get(metrics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            http_error_metrics,
        ))
        .with_state(state)
        .layer(cors)
}
