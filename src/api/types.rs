use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{JobPosting, ResultTable, TermGroup};
use crate::services::Advisory;
use crate::services::markdown::render_description;
use crate::services::form::SearchForm;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// One posting plus its description rendered for display.
#[derive(Debug, Serialize)]
pub struct JobDto {
    #[serde(flatten)]
    pub posting: JobPosting,
    /// Sanitized HTML of `description`.
    pub description_html: String,
}

impl From<JobPosting> for JobDto {
    fn from(posting: JobPosting) -> Self {
        let description_html = render_description(&posting.description);
        Self {
            posting,
            description_html,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobGroupDto {
    pub search_term: String,
    pub jobs: Vec<JobDto>,
}

impl From<TermGroup> for JobGroupDto {
    fn from(group: TermGroup) -> Self {
        Self {
            search_term: group.search_term,
            jobs: group.jobs.into_iter().map(JobDto::from).collect(),
        }
    }
}

/// A result table as the browse/detail view consumes it.
#[derive(Debug, Serialize)]
pub struct JobsDto {
    pub run_id: Option<Uuid>,
    pub generated_at: Option<DateTime<Utc>>,
    pub total_jobs: usize,
    pub groups: Vec<JobGroupDto>,
}

impl JobsDto {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            run_id: None,
            generated_at: None,
            total_jobs: 0,
            groups: Vec::new(),
        }
    }
}

impl From<&ResultTable> for JobsDto {
    fn from(table: &ResultTable) -> Self {
        Self {
            run_id: Some(table.run_id),
            generated_at: Some(table.generated_at),
            total_jobs: table.len(),
            groups: table.grouped().into_iter().map(JobGroupDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub jobs: JobsDto,
    pub advisories: Vec<Advisory>,
    /// Set when the run finished without any postings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChoiceDto {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SiteOptionDto {
    pub id: &'static str,
    pub label: &'static str,
    pub selected_by_default: bool,
    /// Countries the site is restricted to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_countries: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct RangeDto {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Serialize)]
pub struct BoundsDto {
    pub results_wanted: RangeDto,
    pub hours_old: RangeDto,
    pub distance: RangeDto,
}

#[derive(Debug, Serialize)]
pub struct OptionsDto {
    pub sites: Vec<SiteOptionDto>,
    pub countries: Vec<String>,
    pub job_types: Vec<ChoiceDto>,
    pub defaults: SearchForm,
    pub bounds: BoundsDto,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub uptime: u64,
    pub service: String,
    pub service_url: String,
    pub metrics_enabled: bool,
}
