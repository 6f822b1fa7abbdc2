use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct CouponMetrics {
    registry: Registry,
    evaluations: IntCounterVec,
    provider_failures: IntCounterVec,
    http_errors: IntCounterVec,
}

impl CouponMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let evaluations = IntCounterVec::new(
            Opts::new(
                "coupon_evaluations_total",
                "Coupon evaluations grouped by outcome",
            ),
            &["outcome"],
        )?;
        let provider_failures = IntCounterVec::new(
            Opts::new(
                "coupon_provider_failures_total",
                "Rule provider lookup failures grouped by kind",
            ),
            &["kind"],
        )?;
        let http_errors = IntCounterVec::new(
            Opts::new(
                "http_errors_total",
                "Count of HTTP error responses emitted (status >= 400)",
            ),
            &["code", "status"],
        )?;
        registry.register(Box::new(evaluations.clone()))?;
        registry.register(Box::new(provider_failures.clone()))?;
        registry.register(Box::new(http_errors.clone()))?;
        Ok(Self { registry, evaluations, provider_failures, http_errors })
    }

    pub fn record_evaluation(&self, outcome: &str) {
        self.evaluations.with_label_values(&[outcome]).inc();
    }

    pub fn record_provider_failure(&self, kind: &str) {
        self.provider_failures.with_label_values(&[kind]).inc();
    }

    pub fn record_http_error(&self, code: &str, status: &str) {
        self.http_errors.with_label_values(&[code, status]).inc();
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}
