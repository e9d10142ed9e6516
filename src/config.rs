use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::{Country, GoogleSearchTerm, SearchConfig, SearchFilters, Site};
use crate::services::form::{
    self, Advisory, FormError, HOURS_OLD_RANGE, RESULTS_WANTED_RANGE,
};

const SERVICE_URL_ENV: &str = "JOBSEARCH_SERVICE_URL";
const API_KEY_ENV: &str = "JOBSEARCH_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub service: ServiceConfig,

    pub server: ServerConfig,

    pub search: SearchDefaults,

    pub batch: BatchConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 0)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Progress event buffer size (default: 100)
    pub event_bus_buffer_size: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 0,
            event_bus_buffer_size: 100,
        }
    }
}

/// Location of the JobSpy-compatible scraping API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,

    /// Sent as `x-api-key` when set.
    pub api_key: Option<String>,

    /// Scraping several sites per term is slow; keep this generous (default: 300)
    pub request_timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_key: None,
            request_timeout_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Leave off for local use over plain HTTP.
    pub secure_cookies: bool,

    /// Idle minutes before a browser session and its results are dropped.
    pub session_idle_minutes: i64,

    /// Most sessions (and result tables) held in memory; the one closest to
    /// expiry is evicted first.
    pub max_sessions: usize,

    /// How often expired sessions are purged from memory.
    pub session_purge_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 8501,
            cors_allowed_origins: vec![
                "http://localhost:8501".to_string(),
                "http://127.0.0.1:8501".to_string(),
            ],
            secure_cookies: false,
            session_idle_minutes: 60,
            max_sessions: 200,
            session_purge_seconds: 60,
        }
    }
}

/// Initial values of the interactive search form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub job_titles: Vec<String>,

    pub country: String,

    pub sites: Vec<Site>,

    pub results_wanted: u32,

    pub hours_old: u32,

    pub distance: u32,
}

fn default_job_titles() -> Vec<String> {
    vec![
        "PMO Lead".to_string(),
        "PMO Analyst".to_string(),
        "PMO".to_string(),
    ]
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            job_titles: default_job_titles(),
            country: "Uk".to_string(),
            sites: Site::default_selection(),
            results_wanted: 20,
            hours_old: 72,
            distance: 50,
        }
    }
}

/// Fixed parameters of the `batch` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub job_titles: Vec<String>,

    pub sites: Vec<Site>,

    pub location: String,

    pub country: String,

    pub results_wanted: u32,

    pub hours_old: u32,

    /// Maximum concurrent searches; 0 runs one per title.
    pub max_workers: usize,

    pub output_path: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            job_titles: default_job_titles(),
            // ZipRecruiter is US/CA only
            sites: vec![Site::Indeed, Site::LinkedIn, Site::Google],
            location: "London, UK".to_string(),
            country: "UK".to_string(),
            results_wanted: 20,
            hours_old: 72,
            max_workers: 0,
            output_path: "jobs.xlsx".to_string(),
        }
    }
}

impl BatchConfig {
    /// Shared search parameters for every batch title. Sites the country
    /// cannot use are dropped with a logged warning.
    ///
    /// # Errors
    /// Returns [`FormError::UnknownCountry`] if `country` is not recognised and
    /// [`FormError::OutOfRange`] for `results_wanted` or `hours_old` outside
    /// the form bounds.
    pub fn search_config(&self) -> Result<SearchConfig, FormError> {
        let (search, advisories) = self.resolve()?;
        for advisory in advisories {
            warn!("[batch] {}", advisory.message);
        }
        Ok(search)
    }

    /// Same checks as the interactive form, returning the advisories instead
    /// of logging them.
    ///
    /// # Errors
    /// See [`Self::search_config`].
    pub fn resolve(&self) -> Result<(SearchConfig, Vec<Advisory>), FormError> {
        let country: Country = self.country.parse()?;
        let results_wanted =
            form::check_range("results_wanted", self.results_wanted, &RESULTS_WANTED_RANGE)?;
        let hours_old = form::check_range("hours_old", self.hours_old, &HOURS_OLD_RANGE)?;
        let (sites, advisories) = form::resolve_sites(self.sites.iter().copied(), country);

        Ok((
            SearchConfig {
                sites,
                location: self.location.trim().to_string(),
                country,
                google_search: GoogleSearchTerm::JobsNearSinceYesterday,
                filters: SearchFilters {
                    results_wanted,
                    hours_old: Some(hours_old),
                    ..SearchFilters::default()
                },
            },
            advisories,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Config {
    /// Loads the first config file found by [`Self::locate`], else defaults,
    /// then applies environment overrides. Runs before logging is set up, so
    /// it does not log.
    pub fn load() -> Result<Self> {
        let mut config = match Self::locate() {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// The config file [`Self::load`] reads, if any exists.
    #[must_use]
    pub fn locate() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|path| path.exists())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(SERVICE_URL_ENV)
            && !url.trim().is_empty()
        {
            self.service.base_url = url;
        }
        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.trim().is_empty()
        {
            self.service.api_key = Some(key);
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("jobsearch").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".jobsearch").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.service.base_url.trim().is_empty() {
            anyhow::bail!("Job search service URL cannot be empty");
        }

        if self.server.enabled && self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        self.batch
            .resolve()
            .context("Invalid [batch] configuration")?;

        if self.server.max_sessions == 0 {
            anyhow::bail!("server.max_sessions must be > 0");
        }

        Ok(())
    }
}
