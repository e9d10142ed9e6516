//! Boundary to the external job-scraping service.
//!
//! Everything site specific (sessions, parsing, pagination, proxies) lives
//! behind [`JobSearchService`]; this crate only builds requests and aggregates
//! the rows that come back.

use thiserror::Error;

use crate::models::{JobPosting, SearchRequest};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Request to job search service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Job search service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid job search service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Job search service error: {0}")]
    Service(String),
}

/// An opaque function from a search request to a table of postings.
///
/// An empty vector is a valid answer and means "nothing found".
#[async_trait::async_trait]
pub trait JobSearchService: Send + Sync {
    /// Runs one search term against every requested site.
    ///
    /// # Errors
    ///
    /// Any transport, status or decoding failure of the underlying service.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<JobPosting>, SearchError>;

    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str {
        "JobSpy"
    }
}
