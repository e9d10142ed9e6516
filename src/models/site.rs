use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A job board the external scraper knows how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Site {
    #[serde(rename = "indeed")]
    Indeed,
    #[serde(rename = "linkedin")]
    LinkedIn,
    #[serde(rename = "zip_recruiter")]
    ZipRecruiter,
    #[serde(rename = "google")]
    Google,
    #[serde(rename = "glassdoor")]
    Glassdoor,
    #[serde(rename = "bayt")]
    Bayt,
    #[serde(rename = "naukri")]
    Naukri,
    #[serde(rename = "bdjobs")]
    BdJobs,
}

impl Site {
    pub const ALL: [Self; 8] = [
        Self::Indeed,
        Self::LinkedIn,
        Self::ZipRecruiter,
        Self::Google,
        Self::Glassdoor,
        Self::Bayt,
        Self::Naukri,
        Self::BdJobs,
    ];

    /// Identifier understood by the scraping service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Indeed => "indeed",
            Self::LinkedIn => "linkedin",
            Self::ZipRecruiter => "zip_recruiter",
            Self::Google => "google",
            Self::Glassdoor => "glassdoor",
            Self::Bayt => "bayt",
            Self::Naukri => "naukri",
            Self::BdJobs => "bdjobs",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Indeed => "Indeed",
            Self::LinkedIn => "LinkedIn",
            Self::ZipRecruiter => "ZipRecruiter",
            Self::Google => "Google",
            Self::Glassdoor => "Glassdoor",
            Self::Bayt => "Bayt",
            Self::Naukri => "Naukri",
            Self::BdJobs => "BDJobs",
        }
    }

    #[must_use]
    pub const fn selected_by_default(self) -> bool {
        matches!(self, Self::Indeed | Self::LinkedIn | Self::Google)
    }

    #[must_use]
    pub fn default_selection() -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|s| s.selected_by_default())
            .collect()
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job site: {0}")]
pub struct UnknownSite(pub String);

impl FromStr for Site {
    type Err = UnknownSite;

    /// Accepts either the wire identifier or the display label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|site| {
                site.as_str().eq_ignore_ascii_case(needle) || site.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownSite(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_id_and_label() {
        assert_eq!("zip_recruiter".parse::<Site>(), Ok(Site::ZipRecruiter));
        assert_eq!("LinkedIn".parse::<Site>(), Ok(Site::LinkedIn));
        assert_eq!(" bdjobs ".parse::<Site>(), Ok(Site::BdJobs));
        assert!("monster".parse::<Site>().is_err());
    }

    #[test]
    fn test_default_selection() {
        assert_eq!(
            Site::default_selection(),
            vec![Site::Indeed, Site::LinkedIn, Site::Google]
        );
    }

    #[test]
    fn test_serde_uses_wire_ids() {
        let json = serde_json::to_string(&[Site::LinkedIn, Site::ZipRecruiter]).unwrap();
        assert_eq!(json, r#"["linkedin","zip_recruiter"]"#);
    }
}
