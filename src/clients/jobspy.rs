use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::ServiceConfig;
use crate::models::{JobPosting, SearchRequest};
use crate::services::job_search::{JobSearchService, SearchError};

const SEARCH_PATH: &str = "api/v1/search_jobs";

/// Request body of the JobSpy API `search_jobs` endpoint.
#[derive(Debug, Serialize)]
struct SearchJobsBody<'a> {
    site_name: Vec<&'static str>,
    search_term: &'a str,
    google_search_term: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_type: Option<&'static str>,
    is_remote: bool,
    results_wanted: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    hours_old: Option<u32>,
    easy_apply: bool,
    offset: u32,
    linkedin_fetch_description: bool,
    country_indeed: &'static str,
}

impl<'a> From<&'a SearchRequest> for SearchJobsBody<'a> {
    fn from(request: &'a SearchRequest) -> Self {
        let filters = &request.filters;
        Self {
            site_name: request.sites.iter().map(|s| s.as_str()).collect(),
            search_term: &request.search_term,
            google_search_term: &request.google_search_term,
            location: Some(request.location.as_str()).filter(|l| !l.is_empty()),
            distance: filters.distance,
            job_type: filters.job_type.map(|t| t.as_str()),
            is_remote: filters.is_remote,
            results_wanted: filters.results_wanted,
            hours_old: filters.hours_old,
            easy_apply: filters.easy_apply,
            offset: filters.offset,
            linkedin_fetch_description: filters.linkedin_fetch_description,
            country_indeed: request.country.as_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchJobsResponse {
    #[serde(default)]
    count: usize,
    #[serde(default)]
    jobs: Vec<JobPosting>,
}

/// HTTP client for a JobSpy-compatible scraping API.
#[derive(Clone)]
pub struct JobSpyClient {
    client: Client,
    search_url: Url,
    api_key: Option<String>,
}

impl JobSpyClient {
    /// Creates a client for the service described by `config`.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("jobsearch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self::with_shared_client(
            client,
            Self::search_url(&config.base_url)?,
            config.api_key.clone(),
        ))
    }

    #[must_use]
    pub const fn with_shared_client(
        client: Client,
        search_url: Url,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            search_url,
            api_key,
        }
    }

    /// Resolves the search endpoint against `base_url`, tolerating a missing
    /// trailing slash.
    pub fn search_url(base_url: &str) -> Result<Url, SearchError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(SEARCH_PATH)?)
    }
}

#[async_trait::async_trait]
impl JobSearchService for JobSpyClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<JobPosting>, SearchError> {
        let body = SearchJobsBody::from(request);

        let mut builder = self.client.post(self.search_url.clone()).json(&body);
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            builder = builder.header("x-api-key", key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let payload: SearchJobsResponse = response.json().await?;
        debug!(
            search_term = %request.search_term,
            count = payload.count,
            rows = payload.jobs.len(),
            "JobSpy response received"
        );
        Ok(payload.jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Country, GoogleSearchTerm, JobType, SearchConfig, SearchFilters, Site};

    fn request() -> SearchRequest {
        SearchConfig {
            sites: vec![Site::Indeed, Site::ZipRecruiter],
            location: String::new(),
            country: Country::USA,
            google_search: GoogleSearchTerm::JobsIn,
            filters: SearchFilters {
                job_type: Some(JobType::FullTime),
                ..SearchFilters::default()
            },
        }
        .request_for("PMO Analyst")
    }

    #[test]
    fn test_search_url_joins_with_or_without_trailing_slash() {
        let a = JobSpyClient::search_url("http://localhost:8000").unwrap();
        let b = JobSpyClient::search_url("http://localhost:8000/").unwrap();
        assert_eq!(a.as_str(), "http://localhost:8000/api/v1/search_jobs");
        assert_eq!(a, b);

        let nested = JobSpyClient::search_url("https://example.com/jobspy").unwrap();
        assert_eq!(nested.as_str(), "https://example.com/jobspy/api/v1/search_jobs");
    }

    #[test]
    fn test_search_url_rejects_garbage() {
        assert!(matches!(
            JobSpyClient::search_url("not a url"),
            Err(SearchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_body_serialization() {
        let request = request();
        let body = serde_json::to_value(SearchJobsBody::from(&request)).unwrap();

        assert_eq!(body["site_name"], serde_json::json!(["indeed", "zip_recruiter"]));
        assert_eq!(body["search_term"], "PMO Analyst");
        assert_eq!(body["job_type"], "fulltime");
        assert_eq!(body["country_indeed"], "usa");
        assert_eq!(body["results_wanted"], 20);
        assert!(body.get("location").is_none());
        assert!(body.get("distance").is_none());
    }

    #[test]
    fn test_response_decoding() {
        let json = r#"{"count":2,"cached":false,"jobs":[
            {"id":"in-1","site":"indeed","title":"PMO Analyst","company":"Acme","location":"NYC","job_url":"https://x/1","description":null},
            {"id":"li-2","site":"linkedin","title":"PMO Analyst II","company":null,"location":null,"job_url":"https://x/2","description":"..."}
        ]}"#;
        let payload: SearchJobsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.count, 2);
        assert_eq!(payload.jobs[1].company, "");
        assert_eq!(payload.jobs[0].description, "");
    }
}
