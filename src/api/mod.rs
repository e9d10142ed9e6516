use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::Config;
use crate::services::{JobSearchService, SearchDispatcher};
use crate::state::SharedState;

mod assets;
mod error;
pub mod events;
pub mod jobs;
mod observability;
mod options;
mod search;
pub mod session_store;
mod system;
mod types;

pub use error::ApiError;
pub use events::NotificationEvent;
pub use session_store::ResultSessionStore;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,

    /// Browser sessions and the result table each one holds.
    pub session_store: ResultSessionStore,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<Config> {
        &self.shared.config
    }

    #[must_use]
    pub fn event_bus(&self) -> &tokio::sync::broadcast::Sender<NotificationEvent> {
        &self.shared.event_bus
    }

    #[must_use]
    pub fn dispatcher(&self) -> &SearchDispatcher {
        &self.shared.dispatcher
    }

    #[must_use]
    pub fn search_service(&self) -> &Arc<dyn JobSearchService> {
        &self.shared.search_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let session_store = ResultSessionStore::new(shared.config.server.max_sessions);
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
        session_store,
    })
}

pub fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config)?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, idle_minutes) = {
        let config = state.config();
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_idle_minutes,
        )
    };

    // Result tables live only in the browser session.
    let session_layer = SessionManagerLayer::new(state.session_store.clone())
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(idle_minutes)));

    let api_router = Router::new()
        .route("/options", get(options::get_options))
        .route("/search", post(search::run_search))
        .route("/jobs", get(jobs::list_jobs).delete(jobs::clear_jobs))
        .route("/jobs/export", get(jobs::export_csv))
        .route("/system/status", get(system::get_status))
        .route("/system/config", get(system::get_config))
        .route("/health", get(system::health_live))
        .route("/metrics", get(observability::get_metrics))
        .merge(events::router())
        .layer(session_layer)
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .fallback(assets::serve_asset)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::track_metrics))
}
