//! Batch command handler: every configured title at once, saved as a workbook.

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::api::NotificationEvent;
use crate::clients::JobSpyClient;
use crate::config::{BatchConfig, Config};
use crate::models::ResultTable;
use crate::services::{JobSearchService, SearchDispatcher, export};

const PREVIEW_ROWS: usize = 5;

pub async fn cmd_batch(config: &Config) -> anyhow::Result<()> {
    let service: Arc<dyn JobSearchService> = Arc::new(JobSpyClient::new(&config.service)?);

    let (event_bus, mut events) = broadcast::channel(config.general.event_bus_buffer_size.max(1));
    let dispatcher = SearchDispatcher::new(service).with_event_bus(event_bus);

    // Ends once the dispatcher (the only sender) is dropped.
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(NotificationEvent::SearchProgress { search_term, .. }) => {
                    println!("Searching for: {search_term}...");
                }
                Ok(NotificationEvent::SearchTermFinished {
                    search_term, found, ..
                }) => {
                    println!("Found {found} jobs for: {search_term}");
                }
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    });

    let result = run_batch(&dispatcher, &config.batch).await;
    drop(dispatcher);
    let _ = printer.await;
    let table = result?;

    println!();
    println!("Found a total of {} jobs across all searches.", table.len());
    print_preview(&table, PREVIEW_ROWS);

    let path = Path::new(&config.batch.output_path);
    export::write_xlsx(&table, path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!();
    println!("Saved all jobs to {}", path.display());
    Ok(())
}

/// Runs the configured titles concurrently and returns the combined table.
///
/// # Errors
/// Fails on an unknown batch country, on an empty title or site list, and on
/// the first failing search.
pub async fn run_batch(
    dispatcher: &SearchDispatcher,
    batch: &BatchConfig,
) -> anyhow::Result<ResultTable> {
    let search = batch.search_config()?;
    let table = dispatcher
        .dispatch_concurrent(&batch.job_titles, &search, batch.max_workers)
        .await?;
    Ok(table)
}

fn print_preview(table: &ResultTable, limit: usize) {
    if table.is_empty() {
        return;
    }

    println!();
    println!(
        "{:<40} {:<25} {:<25} {:<12}",
        "title", "company", "location", "site"
    );
    println!("{:-<105}", "");
    for job in table.rows.iter().take(limit) {
        println!(
            "{:<40} {:<25} {:<25} {:<12}",
            clip(&job.title, 40),
            clip(&job.company, 25),
            clip(&job.location, 25),
            clip(&job.site, 12)
        );
    }
    if table.len() > limit {
        println!("... and {} more", table.len() - limit);
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
        clipped.push('…');
        clipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_keeps_short_values() {
        assert_eq!(clip("PMO", 10), "PMO");
    }

    #[test]
    fn clip_shortens_to_width() {
        let clipped = clip("Programme Management Office Lead", 10);
        assert_eq!(clipped.chars().count(), 10);
        assert!(clipped.ends_with('…'));
    }
}
