use anyhow::Result;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::error;

use crate::AppState;

#[derive(Clone)]
pub struct PortalMetrics {
    registry: Registry,
    login_attempts: IntCounterVec,
    tokens_issued: IntCounterVec,
    token_failures: IntCounter,
}

impl PortalMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let login_attempts = IntCounterVec::new(
            Opts::new(
                "portal_login_attempts_total",
                "Count of login attempts grouped by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(login_attempts.clone()))?;

        let tokens_issued = IntCounterVec::new(
            Opts::new(
                "portal_tokens_issued_total",
                "Count of embed tokens issued grouped by delivery mechanism",
            ),
            &["delivery"],
        )?;
        registry.register(Box::new(tokens_issued.clone()))?;

        let token_failures = IntCounter::new(
            "portal_token_failures_total",
            "Count of failed embed token issuance attempts",
        )?;
        registry.register(Box::new(token_failures.clone()))?;

        Ok(Self {
            registry,
            login_attempts,
            tokens_issued,
            token_failures,
        })
    }

    pub fn login_attempt(&self, outcome: &str) {
        self.login_attempts.with_label_values(&[outcome]).inc();
    }

    pub fn token_issued(&self, delivery: &str) {
        self.tokens_issued.with_label_values(&[delivery]).inc();
    }

    pub fn token_failure(&self) {
        self.token_failures.inc();
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

pub async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(response) => response,
        Err(err) => {
            error!(error = %err, "failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
