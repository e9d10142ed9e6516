//! System API endpoints: status, effective configuration and liveness.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiResponse, AppState, SystemStatus};
use crate::config::Config;

const MASK: &str = "********";

#[derive(Debug, Serialize)]
pub struct HealthLiveResponse {
    pub status: &'static str,
}

/// `GET /api/system/status`
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<SystemStatus>> {
    let config = state.config();
    Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.start_time.elapsed().as_secs(),
        service: state.search_service().name().to_string(),
        service_url: config.service.base_url.clone(),
        metrics_enabled: state.prometheus_handle.is_some(),
    }))
}

/// `GET /api/system/config`
///
/// The API key is replaced with a mask string.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Config>> {
    let mut config = state.config().as_ref().clone();
    if config.service.api_key.is_some() {
        config.service.api_key = Some(MASK.to_string());
    }
    Json(ApiResponse::success(config))
}

/// `GET /api/health`
///
/// Liveness check: the API process is running.
pub async fn health_live() -> impl IntoResponse {
    Json(ApiResponse::success(HealthLiveResponse { status: "alive" }))
}
