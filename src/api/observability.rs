//! Prometheus endpoint plus per-request tracing and metrics middleware.
//!
//! Requests are labelled by the part of the app they hit rather than by raw
//! path, so asset requests and unknown URLs share one bounded label set.
//! `/api/search` responses carry the run id of the search they performed,
//! which is recorded on the request span.

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, field, info, info_span};
use uuid::Uuid;

use crate::api::AppState;

/// Attached to a response by handlers that ran a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRun(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Search,
    Results,
    Events,
    Api,
    Ui,
}

impl Surface {
    pub fn classify(path: &str) -> Self {
        match path {
            "/api/search" => Self::Search,
            "/api/events" => Self::Events,
            p if p == "/api/jobs" || p.starts_with("/api/jobs/") => Self::Results,
            p if p.starts_with("/api/") => Self::Api,
            _ => Self::Ui,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Results => "results",
            Self::Events => "events",
            Self::Api => "api",
            Self::Ui => "ui",
        }
    }

    /// SSE connections stay open for the life of the page; their duration is
    /// not a latency.
    const fn has_latency(self) -> bool {
        !matches!(self, Self::Events)
    }
}

const fn status_class(status: u16) -> &'static str {
    match status {
        500.. => "5xx",
        400..=499 => "4xx",
        300..=399 => "3xx",
        _ => "2xx",
    }
}

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let surface = Surface::classify(req.uri().path());

    let span = info_span!(
        "request",
        method = %method,
        path = %req.uri().path(),
        surface = surface.as_str(),
        run_id = field::Empty,
    );

    async move {
        let response = next.run(req).await;
        let status = response.status().as_u16();

        if let Some(SearchRun(run_id)) = response.extensions().get::<SearchRun>() {
            tracing::Span::current().record("run_id", field::display(run_id));
        }

        let labels = [
            ("surface", surface.as_str().to_string()),
            ("method", method.to_string()),
            ("status", status_class(status).to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);

        if surface.has_latency() {
            metrics::histogram!("http_request_duration_seconds", "surface" => surface.as_str())
                .record(start.elapsed().as_secs_f64());
            info!(
                status,
                duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "Request finished"
            );
        }

        response
    }
    .instrument(span)
    .await
}

const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    (
        "content-security-policy",
        "default-src 'self'; img-src 'self' data: https:; script-src 'self'; \
         style-src 'self' 'unsafe-inline'; connect-src 'self'; frame-ancestors 'none'; \
         base-uri 'self'; form-action 'self'",
    ),
];

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    response
}
