use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Country, Site};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    #[serde(rename = "fulltime")]
    FullTime,
    #[serde(rename = "parttime")]
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub const ALL: [Self; 4] = [
        Self::FullTime,
        Self::PartTime,
        Self::Contract,
        Self::Internship,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "fulltime",
            Self::PartTime => "parttime",
            Self::Contract => "contract",
            Self::Internship => "internship",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullTime => "Full-time",
            Self::PartTime => "Part-time",
            Self::Contract => "Contract",
            Self::Internship => "Internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job type: {0}")]
pub struct UnknownJobType(pub String);

impl FromStr for JobType {
    type Err = UnknownJobType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle) || t.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownJobType(s.to_string()))
    }
}

/// Optional filters forwarded verbatim to the scraping service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub job_type: Option<JobType>,
    pub is_remote: bool,
    pub hours_old: Option<u32>,
    pub results_wanted: u32,
    /// Radius in miles. Only meaningful with a location and without remote-only.
    pub distance: Option<u32>,
    pub offset: u32,
    pub easy_apply: bool,
    pub linkedin_fetch_description: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            job_type: None,
            is_remote: false,
            hours_old: Some(72),
            results_wanted: 20,
            distance: None,
            offset: 0,
            easy_apply: false,
            linkedin_fetch_description: false,
        }
    }
}

/// How the Google-specific query string is derived for each search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GoogleSearchTerm {
    /// Used as-is for every term.
    Override(String),
    /// `"<term>" jobs in <location>`
    JobsIn,
    /// `"<term>" jobs near <location> since yesterday`
    JobsNearSinceYesterday,
}

impl GoogleSearchTerm {
    #[must_use]
    pub fn for_term(&self, term: &str, location: &str) -> String {
        match self {
            Self::Override(query) => query.clone(),
            Self::JobsIn => format!("\"{term}\" jobs in {location}"),
            Self::JobsNearSinceYesterday => {
                format!("\"{term}\" jobs near {location} since yesterday")
            }
        }
    }
}

/// Parameters shared by every search of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub sites: Vec<Site>,
    pub location: String,
    pub country: Country,
    pub google_search: GoogleSearchTerm,
    pub filters: SearchFilters,
}

impl SearchConfig {
    #[must_use]
    pub fn request_for(&self, search_term: &str) -> SearchRequest {
        SearchRequest {
            search_term: search_term.to_string(),
            sites: self.sites.clone(),
            location: self.location.clone(),
            country: self.country,
            google_search_term: self.google_search.for_term(search_term, &self.location),
            filters: self.filters.clone(),
        }
    }
}

/// One query against the job search service. Built per title and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub search_term: String,
    pub sites: Vec<Site>,
    pub location: String,
    pub country: Country,
    pub google_search_term: String,
    pub filters: SearchFilters,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(google_search: GoogleSearchTerm) -> SearchConfig {
        SearchConfig {
            sites: vec![Site::Indeed, Site::Google],
            location: "London, UK".to_string(),
            country: Country::UK,
            google_search,
            filters: SearchFilters::default(),
        }
    }

    #[test]
    fn test_request_for_copies_shared_fields() {
        let request = config(GoogleSearchTerm::JobsIn).request_for("PMO Lead");
        assert_eq!(request.search_term, "PMO Lead");
        assert_eq!(request.sites, vec![Site::Indeed, Site::Google]);
        assert_eq!(request.country, Country::UK);
        assert_eq!(request.google_search_term, "\"PMO Lead\" jobs in London, UK");
    }

    #[test]
    fn test_google_search_variants() {
        let near = GoogleSearchTerm::JobsNearSinceYesterday.for_term("PMO", "London, UK");
        assert_eq!(near, "\"PMO\" jobs near London, UK since yesterday");

        let fixed = GoogleSearchTerm::Override("rust jobs remote".to_string());
        assert_eq!(fixed.for_term("PMO", "London"), "rust jobs remote");
    }

    #[test]
    fn test_job_type_parse() {
        assert_eq!("Full-time".parse::<JobType>(), Ok(JobType::FullTime));
        assert_eq!("internship".parse::<JobType>(), Ok(JobType::Internship));
        assert!("freelance".parse::<JobType>().is_err());
    }
}
