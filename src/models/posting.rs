use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Scraper columns can come back as `null`; treat those as empty text.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One scraped job posting. Field order is the export column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub site: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub job_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub date_posted: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub is_remote: Option<bool>,
    #[serde(default)]
    pub min_amount: Option<f64>,
    #[serde(default)]
    pub max_amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub search_term: String,
}

impl JobPosting {
    pub const COLUMNS: [&'static str; 14] = [
        "title",
        "company",
        "location",
        "site",
        "job_url",
        "description",
        "date_posted",
        "job_type",
        "is_remote",
        "min_amount",
        "max_amount",
        "currency",
        "interval",
        "search_term",
    ];
}

/// Postings for one search term, in table order.
#[derive(Debug, Clone, Serialize)]
pub struct TermGroup {
    pub search_term: String,
    pub jobs: Vec<JobPosting>,
}

/// Concatenation of every search of one run.
///
/// Rows keep the order in which their searches were aggregated; nothing is
/// deduplicated across terms or sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<JobPosting>,
}

impl Default for ResultTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultTable {
    #[must_use]
    pub fn new() -> Self {
        Self::with_run_id(Uuid::new_v4())
    }

    #[must_use]
    pub fn with_run_id(run_id: Uuid) -> Self {
        Self {
            run_id,
            generated_at: Utc::now(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends `rows`, tagging each one with the term that produced it.
    pub fn append_tagged(&mut self, search_term: &str, rows: Vec<JobPosting>) {
        self.rows.extend(rows.into_iter().map(|mut row| {
            row.search_term = search_term.to_string();
            row
        }));
    }

    /// Distinct search terms in order of first appearance.
    #[must_use]
    pub fn search_terms(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !terms.contains(&row.search_term.as_str()) {
                terms.push(&row.search_term);
            }
        }
        terms
    }

    #[must_use]
    pub fn grouped(&self) -> Vec<TermGroup> {
        self.search_terms()
            .into_iter()
            .map(|term| TermGroup {
                search_term: term.to_string(),
                jobs: self
                    .rows
                    .iter()
                    .filter(|row| row.search_term == term)
                    .cloned()
                    .collect(),
            })
            .collect()
    }
}
