//! Fan-out of one search per job title and fan-in of the returned rows.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{error, info};
use uuid::Uuid;

use crate::api::NotificationEvent;
use crate::models::{JobPosting, ResultTable, SearchConfig};
use crate::services::job_search::{JobSearchService, SearchError};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Please enter at least one job title.")]
    NoJobTitles,

    #[error("Please select at least one job site.")]
    NoSites,

    #[error("Search for '{search_term}' failed: {source}")]
    Service {
        search_term: String,
        #[source]
        source: SearchError,
    },
}

impl DispatchError {
    /// True for the input guards that block dispatch before any search runs.
    #[must_use]
    pub const fn is_guard(&self) -> bool {
        matches!(self, Self::NoJobTitles | Self::NoSites)
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Interactive,
    Batch,
}

impl Mode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Interactive => "interactive",
            Self::Batch => "batch",
        }
    }
}

#[derive(Clone)]
pub struct SearchDispatcher {
    service: Arc<dyn JobSearchService>,
    event_bus: Option<broadcast::Sender<NotificationEvent>>,
}

impl SearchDispatcher {
    #[must_use]
    pub fn new(service: Arc<dyn JobSearchService>) -> Self {
        Self {
            service,
            event_bus: None,
        }
    }

    /// Publishes progress events on `event_bus` while dispatching.
    #[must_use]
    pub fn with_event_bus(mut self, event_bus: broadcast::Sender<NotificationEvent>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Runs the titles one after another, in order, publishing progress
    /// before each call. Every event and the returned table carry `run_id`.
    ///
    /// # Errors
    ///
    /// Returns a guard error when there are no titles or no sites, and aborts
    /// with [`DispatchError::Service`] on the first failing search.
    pub async fn dispatch_sequential(
        &self,
        run_id: Uuid,
        titles: &[String],
        config: &SearchConfig,
    ) -> Result<ResultTable, DispatchError> {
        Self::check_guards(titles, config)?;

        let mut table = ResultTable::with_run_id(run_id);
        let total = titles.len();
        self.publish(NotificationEvent::SearchStarted {
            run_id: table.run_id,
            total,
        });

        for (index, term) in titles.iter().enumerate() {
            self.publish(NotificationEvent::SearchProgress {
                run_id: table.run_id,
                current: index + 1,
                total,
                search_term: term.clone(),
            });

            let rows = self
                .search_one(table.run_id, term, config, Mode::Interactive)
                .await?;
            table.append_tagged(term, rows);
        }

        self.finish(&table);
        Ok(table)
    }

    /// Runs every title concurrently on at most `max_workers` in-flight
    /// searches (`0` means one per title) and concatenates rows in completion
    /// order. Progress is published as each search actually starts.
    ///
    /// # Errors
    ///
    /// Same guards as [`Self::dispatch_sequential`]. The first failing search
    /// aborts the whole run; searches still in flight are dropped and no
    /// partial table is returned.
    pub async fn dispatch_concurrent(
        &self,
        titles: &[String],
        config: &SearchConfig,
        max_workers: usize,
    ) -> Result<ResultTable, DispatchError> {
        Self::check_guards(titles, config)?;

        let workers = if max_workers == 0 {
            titles.len()
        } else {
            max_workers.min(titles.len())
        };

        let mut table = ResultTable::new();
        self.publish(NotificationEvent::SearchStarted {
            run_id: table.run_id,
            total: titles.len(),
        });

        let run_id = table.run_id;
        let total = titles.len();
        let mut completions = stream::iter(titles.iter().enumerate())
            .map(|(index, term)| async move {
                self.publish(NotificationEvent::SearchProgress {
                    run_id,
                    current: index + 1,
                    total,
                    search_term: term.clone(),
                });
                let rows = self.search_one(run_id, term, config, Mode::Batch).await;
                (term, rows)
            })
            .buffer_unordered(workers);

        while let Some((term, rows)) = completions.next().await {
            table.append_tagged(term, rows?);
        }

        self.finish(&table);
        Ok(table)
    }

    fn check_guards(titles: &[String], config: &SearchConfig) -> Result<(), DispatchError> {
        if titles.is_empty() {
            return Err(DispatchError::NoJobTitles);
        }
        if config.sites.is_empty() {
            return Err(DispatchError::NoSites);
        }
        Ok(())
    }

    async fn search_one(
        &self,
        run_id: Uuid,
        term: &str,
        config: &SearchConfig,
        mode: Mode,
    ) -> Result<Vec<JobPosting>, DispatchError> {
        let request = config.request_for(term);
        info!(
            search_term = %term,
            sites = ?request.sites,
            mode = mode.as_str(),
            "Searching for: {}...",
            term
        );

        let start = Instant::now();
        let result = self.service.search(&request).await;
        metrics::histogram!("jobsearch_search_duration_seconds", "mode" => mode.as_str())
            .record(start.elapsed().as_secs_f64());

        match result {
            Ok(rows) => {
                metrics::counter!(
                    "jobsearch_searches_total",
                    "mode" => mode.as_str(),
                    "outcome" => "success"
                )
                .increment(1);
                metrics::counter!("jobsearch_postings_total")
                    .increment(u64::try_from(rows.len()).unwrap_or(u64::MAX));

                info!(
                    search_term = %term,
                    found = rows.len(),
                    "Found {} jobs for: {}",
                    rows.len(),
                    term
                );
                self.publish(NotificationEvent::SearchTermFinished {
                    run_id,
                    search_term: term.to_string(),
                    found: rows.len(),
                });
                Ok(rows)
            }
            Err(source) => {
                metrics::counter!(
                    "jobsearch_searches_total",
                    "mode" => mode.as_str(),
                    "outcome" => "error"
                )
                .increment(1);

                error!(
                    search_term = %term,
                    service = self.service.name(),
                    "Search failed: {}",
                    source
                );
                self.publish(NotificationEvent::SearchFailed {
                    run_id,
                    message: format!("Search for '{term}' failed: {source}"),
                });
                Err(DispatchError::Service {
                    search_term: term.to_string(),
                    source,
                })
            }
        }
    }

    fn finish(&self, table: &ResultTable) {
        info!(
            run_id = %table.run_id,
            total_jobs = table.len(),
            "Found a total of {} jobs across all searches",
            table.len()
        );
        self.publish(NotificationEvent::SearchFinished {
            run_id: table.run_id,
            total_jobs: table.len(),
        });
    }

    fn publish(&self, event: NotificationEvent) {
        if let Some(bus) = &self.event_bus {
            let _ = bus.send(event);
        }
    }
}
