use axum::{
    Json,
    http::header,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use super::{ApiError, ApiResponse, JobsDto};
use crate::models::ResultTable;
use crate::services::export;

pub const JOBS_SESSION_KEY: &str = "jobs_table";

async fn current_table(session: &Session) -> Result<Option<ResultTable>, ApiError> {
    Ok(session
        .get::<ResultTable>(JOBS_SESSION_KEY)
        .await?
        .filter(|table| !table.is_empty()))
}

/// `GET /api/jobs`
///
/// Results of the session's last search, grouped by search term.
pub async fn list_jobs(session: Session) -> Result<Json<ApiResponse<JobsDto>>, ApiError> {
    let dto = current_table(&session)
        .await?
        .as_ref()
        .map_or_else(JobsDto::empty, JobsDto::from);

    Ok(Json(ApiResponse::success(dto)))
}

/// `DELETE /api/jobs`
pub async fn clear_jobs(session: Session) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let removed = session
        .remove::<ResultTable>(JOBS_SESSION_KEY)
        .await?
        .is_some();
    Ok(Json(ApiResponse::success(removed)))
}

/// `GET /api/jobs/export`
///
/// Downloads every row of the session's results as `jobs.csv`.
pub async fn export_csv(session: Session) -> Result<Response, ApiError> {
    let table = current_table(&session)
        .await?
        .ok_or_else(|| ApiError::NotFound("No search results to export".to_string()))?;

    let csv = export::to_csv(&table)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"jobs.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
