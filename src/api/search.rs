use axum::{Extension, Json, extract::State};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::info;

use super::jobs::JOBS_SESSION_KEY;
use super::observability::SearchRun;
use super::{ApiError, ApiResponse, AppState, JobsDto, SearchResponse};
use crate::models::ResultTable;
use crate::services::form::SearchForm;

const NO_JOBS_FOUND: &str = "No jobs found for the given criteria.";

/// Runs one interactive search.
///
/// # Endpoint
/// `POST /api/search`
///
/// Titles are searched one at a time; progress is published on `/api/events`.
/// The form may carry its own `run_id`; every progress event of the run uses
/// it. On success the session's previous results are replaced. A missing title or
/// site list is rejected before anything is searched and leaves the previous
/// results untouched.
pub async fn run_search(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(form): Json<SearchForm>,
) -> Result<(Extension<SearchRun>, Json<ApiResponse<SearchResponse>>), ApiError> {
    let prepared = form.prepare()?;

    let table = match state
        .dispatcher()
        .dispatch_sequential(prepared.run_id, &prepared.titles, &prepared.config)
        .await
    {
        Ok(table) => table,
        Err(err) => {
            if !err.is_guard() {
                session.remove::<ResultTable>(JOBS_SESSION_KEY).await?;
            }
            return Err(err.into());
        }
    };

    let warning = if table.is_empty() {
        session.remove::<ResultTable>(JOBS_SESSION_KEY).await?;
        Some(NO_JOBS_FOUND.to_string())
    } else {
        session.insert(JOBS_SESSION_KEY, &table).await?;
        None
    };

    info!(
        run_id = %table.run_id,
        titles = prepared.titles.len(),
        total_jobs = table.len(),
        "Interactive search finished"
    );

    Ok((
        Extension(SearchRun(table.run_id)),
        Json(ApiResponse::success(SearchResponse {
            jobs: JobsDto::from(&table),
            advisories: prepared.advisories,
            warning,
        })),
    ))
}
