//! Normalization of the interactive search form.
//!
//! Turns the raw form fields into the title list and [`SearchConfig`] the
//! dispatcher consumes, and collects the non-blocking advisories the UI shows
//! next to the results.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;
use uuid::Uuid;

use crate::config::SearchDefaults;
use crate::models::country::UnknownCountry;
use crate::models::request::UnknownJobType;
use crate::models::site::UnknownSite;
use crate::models::{Country, GoogleSearchTerm, JobType, SearchConfig, SearchFilters, Site};

pub const RESULTS_WANTED_RANGE: RangeInclusive<u32> = 1..=100;
pub const HOURS_OLD_RANGE: RangeInclusive<u32> = 1..=720;
pub const DISTANCE_RANGE: RangeInclusive<u32> = 1..=200;

/// `hours_old` at the top of the range means "no recency limit" for the
/// site-limitation advisories.
const HOURS_OLD_UNLIMITED: u32 = 720;

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    UnknownCountry(#[from] UnknownCountry),

    #[error(transparent)]
    UnknownSite(#[from] UnknownSite),

    #[error(transparent)]
    UnknownJobType(#[from] UnknownJobType),

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryLevel {
    Warning,
    Info,
}

/// A note about how the selected sites treat the chosen filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub level: AdvisoryLevel,
    pub message: String,
}

impl Advisory {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: AdvisoryLevel::Warning,
            message: message.into(),
        }
    }

    fn info(message: impl Into<String>) -> Self {
        Self {
            level: AdvisoryLevel::Info,
            message: message.into(),
        }
    }
}

/// Raw form fields as posted by the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    /// One job title per line.
    pub job_titles: String,
    pub country: String,
    pub location: String,
    pub sites: Vec<String>,
    pub results_wanted: u32,
    pub hours_old: u32,
    /// `None`, empty or `"any"` means no job-type filter.
    pub job_type: Option<String>,
    pub is_remote: bool,
    pub easy_apply: bool,
    pub distance: u32,
    pub offset: u32,
    pub linkedin_fetch_description: bool,
    pub google_search_override: String,
    /// Client-chosen id so a page can pick its own run out of `/api/events`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self::from_defaults(&SearchDefaults::default())
    }
}

/// Everything needed to dispatch one interactive run.
#[derive(Debug, Clone)]
pub struct PreparedSearch {
    pub run_id: Uuid,
    pub titles: Vec<String>,
    pub config: SearchConfig,
    pub advisories: Vec<Advisory>,
}

/// # Errors
/// Returns [`FormError::OutOfRange`] naming `field` when `value` is outside `range`.
pub fn check_range(
    field: &'static str,
    value: u32,
    range: &RangeInclusive<u32>,
) -> Result<u32, FormError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(FormError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Drops ZipRecruiter outside USA/Canada and repeated sites, keeping the
/// first-seen order. Each dropped ZipRecruiter yields a warning.
pub fn resolve_sites(
    requested: impl IntoIterator<Item = Site>,
    country: Country,
) -> (Vec<Site>, Vec<Advisory>) {
    let mut advisories = Vec::new();
    let mut sites: Vec<Site> = Vec::new();
    for site in requested {
        if site == Site::ZipRecruiter && !country.supports_zip_recruiter() {
            advisories.push(Advisory::warning(format!(
                "ZipRecruiter is only available for USA and Canada; it was skipped for {country}."
            )));
            continue;
        }
        if !sites.contains(&site) {
            sites.push(site);
        }
    }
    (sites, advisories)
}

/// Splits a text area into trimmed, non-blank lines.
#[must_use]
pub fn parse_job_titles(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

impl SearchForm {
    #[must_use]
    pub fn from_defaults(defaults: &SearchDefaults) -> Self {
        Self {
            job_titles: defaults.job_titles.join("\n"),
            country: defaults.country.clone(),
            location: String::new(),
            sites: defaults
                .sites
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            results_wanted: defaults.results_wanted,
            hours_old: defaults.hours_old,
            job_type: None,
            is_remote: false,
            easy_apply: false,
            distance: defaults.distance,
            offset: 0,
            linkedin_fetch_description: false,
            google_search_override: String::new(),
            run_id: None,
        }
    }

    /// Validates the form and builds the per-run search configuration.
    ///
    /// Empty title or site lists are not rejected here; the dispatcher owns
    /// those guards so that they apply to every entry point.
    ///
    /// # Errors
    ///
    /// Unknown country, site or job type, or a numeric field out of range.
    pub fn prepare(&self) -> Result<PreparedSearch, FormError> {
        let titles = parse_job_titles(&self.job_titles);
        let country: Country = self.country.parse()?;
        let location = self.location.trim().to_string();

        let results_wanted =
            check_range("results_wanted", self.results_wanted, &RESULTS_WANTED_RANGE)?;
        let hours_old = check_range("hours_old", self.hours_old, &HOURS_OLD_RANGE)?;

        let job_type = match self.job_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) if raw.eq_ignore_ascii_case("any") => None,
            Some(raw) => Some(raw.parse::<JobType>()?),
        };

        // Radius is meaningless without a location or for remote-only searches.
        let distance = if self.is_remote || location.is_empty() {
            None
        } else {
            Some(check_range("distance", self.distance, &DISTANCE_RANGE)?)
        };

        let requested = self
            .sites
            .iter()
            .map(|raw| raw.parse::<Site>())
            .collect::<Result<Vec<_>, _>>()?;
        let (sites, mut advisories) = resolve_sites(requested, country);

        let google_override = self.google_search_override.trim();
        let google_search = if google_override.is_empty() {
            GoogleSearchTerm::JobsIn
        } else {
            GoogleSearchTerm::Override(google_override.to_string())
        };

        let filters = SearchFilters {
            job_type,
            is_remote: self.is_remote,
            hours_old: Some(hours_old),
            results_wanted,
            distance,
            offset: self.offset,
            easy_apply: self.easy_apply,
            linkedin_fetch_description: self.linkedin_fetch_description,
        };

        advisories.extend(site_advisories(&sites, &filters, &location, &google_search));

        Ok(PreparedSearch {
            run_id: self.run_id.unwrap_or_else(Uuid::new_v4),
            titles,
            config: SearchConfig {
                sites,
                location,
                country,
                google_search,
                filters,
            },
            advisories,
        })
    }
}

fn site_advisories(
    sites: &[Site],
    filters: &SearchFilters,
    location: &str,
    google_search: &GoogleSearchTerm,
) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    let recency_limited = filters
        .hours_old
        .is_some_and(|hours| hours < HOURS_OLD_UNLIMITED);

    if sites.contains(&Site::Indeed)
        && recency_limited
        && (filters.job_type.is_some() || filters.is_remote || filters.easy_apply)
    {
        advisories.push(Advisory::warning(
            "Indeed Limitation: When 'Hours Old' is used, filters like 'Job Type', 'Remote', or 'Easy Apply' might be ignored.",
        ));
    }

    if sites.contains(&Site::LinkedIn) {
        if recency_limited && filters.easy_apply {
            advisories.push(Advisory::warning(
                "LinkedIn Limitation: 'Hours Old' and 'Easy Apply' are mutually exclusive and may not work together.",
            ));
        }
        if !filters.linkedin_fetch_description {
            advisories.push(Advisory::info(
                "For full LinkedIn job details, enable 'Fetch full LinkedIn descriptions'.",
            ));
        }
    }

    if sites.contains(&Site::Google) && !matches!(google_search, GoogleSearchTerm::Override(_)) {
        advisories.push(Advisory::info(
            "For best Google results, use the 'Google Search Override' field with specific syntax.",
        ));
    }

    if filters.is_remote && !location.is_empty() {
        advisories.push(Advisory::info(
            "Search radius is disabled when 'Remote Only' is selected.",
        ));
    }

    advisories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SearchForm {
        SearchForm {
            job_titles: "PMO Lead\n\n  PMO Analyst  \n".to_string(),
            location: "London".to_string(),
            ..SearchForm::default()
        }
    }

    #[test]
    fn test_titles_are_trimmed_and_blank_lines_dropped() {
        let prepared = form().prepare().unwrap();
        assert_eq!(prepared.titles, vec!["PMO Lead", "PMO Analyst"]);
    }

    #[test]
    fn test_defaults_produce_default_sites_and_uk() {
        let prepared = form().prepare().unwrap();
        assert_eq!(
            prepared.config.sites,
            vec![Site::Indeed, Site::LinkedIn, Site::Google]
        );
        assert_eq!(prepared.config.country, Country::UK);
        assert_eq!(prepared.config.filters.results_wanted, 20);
        assert_eq!(prepared.config.filters.hours_old, Some(72));
        assert_eq!(prepared.config.filters.distance, Some(50));
    }

    #[test]
    fn test_zip_recruiter_dropped_outside_north_america() {
        let mut uk = form();
        uk.sites = vec!["zip_recruiter".to_string()];
        let prepared = uk.prepare().unwrap();
        assert!(prepared.config.sites.is_empty());
        assert!(
            prepared
                .advisories
                .iter()
                .any(|a| a.message.contains("ZipRecruiter"))
        );

        let mut usa = form();
        usa.country = "Usa".to_string();
        usa.sites = vec!["zip_recruiter".to_string()];
        assert_eq!(usa.prepare().unwrap().config.sites, vec![Site::ZipRecruiter]);
    }

    #[test]
    fn test_distance_disabled_for_remote_or_missing_location() {
        let mut remote = form();
        remote.is_remote = true;
        let prepared = remote.prepare().unwrap();
        assert_eq!(prepared.config.filters.distance, None);
        assert!(
            prepared
                .advisories
                .iter()
                .any(|a| a.message.contains("Search radius"))
        );

        let mut anywhere = form();
        anywhere.location = "   ".to_string();
        assert_eq!(anywhere.prepare().unwrap().config.filters.distance, None);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut too_many = form();
        too_many.results_wanted = 101;
        assert!(matches!(
            too_many.prepare(),
            Err(FormError::OutOfRange {
                field: "results_wanted",
                ..
            })
        ));

        let mut too_old = form();
        too_old.hours_old = 0;
        assert!(too_old.prepare().is_err());
    }

    #[test]
    fn test_unknown_values_rejected() {
        let mut bad_country = form();
        bad_country.country = "Atlantis".to_string();
        assert!(matches!(
            bad_country.prepare(),
            Err(FormError::UnknownCountry(_))
        ));

        let mut bad_site = form();
        bad_site.sites = vec!["monster".to_string()];
        assert!(matches!(bad_site.prepare(), Err(FormError::UnknownSite(_))));
    }

    #[test]
    fn test_google_override_used_verbatim() {
        let mut f = form();
        f.google_search_override = "pmo jobs near London since yesterday".to_string();
        let request = f.prepare().unwrap().config.request_for("PMO Lead");
        assert_eq!(
            request.google_search_term,
            "pmo jobs near London since yesterday"
        );
    }

    #[test]
    fn test_indeed_and_linkedin_limitations() {
        let mut f = form();
        f.easy_apply = true;
        let advisories = f.prepare().unwrap().advisories;
        assert!(advisories.iter().any(|a| a.message.starts_with("Indeed Limitation")));
        assert!(advisories.iter().any(|a| a.message.starts_with("LinkedIn Limitation")));

        let mut unlimited = form();
        unlimited.easy_apply = true;
        unlimited.hours_old = 720;
        let advisories = unlimited.prepare().unwrap().advisories;
        assert!(!advisories.iter().any(|a| a.level == AdvisoryLevel::Warning));
    }

    #[test]
    fn test_any_job_type_matches_case_insensitively() {
        for raw in ["any", "Any", "ANY", " aNy "] {
            let mut f = form();
            f.job_type = Some(raw.to_string());
            assert_eq!(f.prepare().unwrap().config.filters.job_type, None, "{raw}");
        }

        let mut contract = form();
        contract.job_type = Some("Contract".to_string());
        assert_eq!(
            contract.prepare().unwrap().config.filters.job_type,
            Some(JobType::Contract)
        );
    }

    #[test]
    fn test_client_run_id_is_kept() {
        let id = Uuid::new_v4();
        let mut f = form();
        f.run_id = Some(id);
        assert_eq!(f.prepare().unwrap().run_id, id);

        assert_ne!(form().prepare().unwrap().run_id, id);
    }

    #[test]
    fn test_resolve_sites_dedups_and_filters_by_country() {
        let requested = [Site::Indeed, Site::ZipRecruiter, Site::Indeed, Site::Google];

        let (sites, advisories) = resolve_sites(requested, Country::UK);
        assert_eq!(sites, vec![Site::Indeed, Site::Google]);
        assert_eq!(advisories.len(), 1);

        let (sites, advisories) = resolve_sites(requested, Country::CANADA);
        assert_eq!(sites, vec![Site::Indeed, Site::ZipRecruiter, Site::Google]);
        assert!(advisories.is_empty());
    }
}
