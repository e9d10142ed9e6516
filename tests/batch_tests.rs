use async_trait::async_trait;
use jobsearch::cli::run_batch;
use jobsearch::config::BatchConfig;
use jobsearch::models::{JobPosting, SearchRequest, Site};
use jobsearch::services::{JobSearchService, SearchDispatcher, SearchError, export};
use std::sync::{Arc, Mutex};

/// Two postings per title; remembers what it was asked.
#[derive(Default)]
struct RecordingSearch {
    requests: Mutex<Vec<SearchRequest>>,
    fail_on: Option<String>,
}

#[async_trait]
impl JobSearchService for RecordingSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<JobPosting>, SearchError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail_on.as_deref() == Some(request.search_term.as_str()) {
            return Err(SearchError::Status {
                status: 500,
                message: "scraper crashed".to_string(),
            });
        }
        Ok(vec![
            JobPosting {
                title: format!("{} (senior)", request.search_term),
                site: "linkedin".to_string(),
                ..JobPosting::default()
            },
            JobPosting {
                title: format!("{} (junior)", request.search_term),
                site: "indeed".to_string(),
                is_remote: Some(true),
                min_amount: Some(40_000.0),
                ..JobPosting::default()
            },
        ])
    }
}

fn batch_config() -> BatchConfig {
    BatchConfig {
        job_titles: vec!["PMO Lead".to_string(), "PMO Analyst".to_string()],
        max_workers: 2,
        ..BatchConfig::default()
    }
}

#[tokio::test]
async fn test_batch_searches_every_title_with_shared_parameters() {
    let stub = Arc::new(RecordingSearch::default());
    let dispatcher = SearchDispatcher::new(stub.clone());

    let table = run_batch(&dispatcher, &batch_config()).await.unwrap();

    assert_eq!(table.len(), 4);
    assert_eq!(
        table
            .rows
            .iter()
            .filter(|r| r.search_term == "PMO Lead")
            .count(),
        2
    );

    let requests = stub.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    for request in requests.iter() {
        assert_eq!(request.sites, vec![Site::Indeed, Site::LinkedIn, Site::Google]);
        assert_eq!(request.location, "London, UK");
        assert_eq!(request.filters.results_wanted, 20);
        assert_eq!(request.filters.hours_old, Some(72));
        assert_eq!(
            request.google_search_term,
            format!(
                "\"{}\" jobs near London, UK since yesterday",
                request.search_term
            )
        );
    }
}

#[tokio::test]
async fn test_batch_with_unknown_country_fails_before_searching() {
    let stub = Arc::new(RecordingSearch::default());
    let dispatcher = SearchDispatcher::new(stub.clone());

    let config = BatchConfig {
        country: "Atlantis".to_string(),
        ..batch_config()
    };

    assert!(run_batch(&dispatcher, &config).await.is_err());
    assert!(stub.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_without_titles_fails() {
    let dispatcher = SearchDispatcher::new(Arc::new(RecordingSearch::default()));

    let config = BatchConfig {
        job_titles: Vec::new(),
        ..batch_config()
    };

    let err = run_batch(&dispatcher, &config).await.unwrap_err();
    assert_eq!(err.to_string(), "Please enter at least one job title.");
}

#[tokio::test]
async fn test_batch_results_save_as_workbook() {
    let dispatcher = SearchDispatcher::new(Arc::new(RecordingSearch::default()));
    let table = run_batch(&dispatcher, &batch_config()).await.unwrap();

    let dir = std::env::temp_dir().join(format!("jobsearch-batch-{}", table.run_id));
    let path = dir.join("out").join("jobs.xlsx");

    export::write_xlsx(&table, &path).unwrap();
    let size = std::fs::metadata(&path).unwrap().len();
    assert!(size > 0);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_batch_drops_zip_recruiter_outside_north_america() {
    let stub = Arc::new(RecordingSearch::default());
    let dispatcher = SearchDispatcher::new(stub.clone());

    let config = BatchConfig {
        sites: vec![Site::ZipRecruiter, Site::Indeed],
        country: "UK".to_string(),
        ..batch_config()
    };

    run_batch(&dispatcher, &config).await.unwrap();

    let requests = stub.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.sites == vec![Site::Indeed]));
}

#[tokio::test]
async fn test_batch_out_of_range_filter_fails_before_searching() {
    let stub = Arc::new(RecordingSearch::default());
    let dispatcher = SearchDispatcher::new(stub.clone());

    let config = BatchConfig {
        results_wanted: 0,
        ..batch_config()
    };

    let err = run_batch(&dispatcher, &config).await.unwrap_err();
    assert!(err.to_string().contains("results_wanted"));
    assert!(stub.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_failure_aborts_the_run() {
    let stub = Arc::new(RecordingSearch {
        fail_on: Some("PMO Analyst".to_string()),
        ..RecordingSearch::default()
    });
    let dispatcher = SearchDispatcher::new(stub);

    let err = run_batch(&dispatcher, &batch_config()).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("PMO Analyst"));
    assert!(message.contains("scraper crashed"));
}
