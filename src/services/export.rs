//! CSV and spreadsheet rendering of a [`ResultTable`].

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::models::{JobPosting, ResultTable};

/// Excel refuses cell strings longer than this.
const XLSX_MAX_CELL_CHARS: usize = 32_767;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the table as UTF-8 CSV with a header row, even when empty.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if a row cannot be serialized.
pub fn to_csv(table: &ResultTable) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(JobPosting::COLUMNS)?;
    for job in &table.rows {
        writer.serialize(job)?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

fn truncate_cell(value: &str) -> &str {
    match value.char_indices().nth(XLSX_MAX_CELL_CHARS) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Writes the table to a single-sheet `.xlsx` workbook at `path`.
///
/// # Errors
///
/// Returns [`ExportError::Xlsx`] if the workbook cannot be built or saved.
pub fn write_xlsx(table: &ResultTable, path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Jobs")?;

    for (col, name) in (0u16..).zip(JobPosting::COLUMNS) {
        sheet.write_string_with_format(0, col, name, &header)?;
    }

    for (row, job) in (1u32..).zip(&table.rows) {
        let text = [
            &job.title,
            &job.company,
            &job.location,
            &job.site,
            &job.job_url,
            &job.description,
        ];
        for (col, value) in (0u16..).zip(text) {
            sheet.write_string(row, col, truncate_cell(value))?;
        }

        if let Some(date_posted) = &job.date_posted {
            sheet.write_string(row, 6, truncate_cell(date_posted))?;
        }
        if let Some(job_type) = &job.job_type {
            sheet.write_string(row, 7, truncate_cell(job_type))?;
        }
        if let Some(is_remote) = job.is_remote {
            sheet.write_boolean(row, 8, is_remote)?;
        }
        if let Some(min_amount) = job.min_amount {
            sheet.write_number(row, 9, min_amount)?;
        }
        if let Some(max_amount) = job.max_amount {
            sheet.write_number(row, 10, max_amount)?;
        }
        if let Some(currency) = &job.currency {
            sheet.write_string(row, 11, truncate_cell(currency))?;
        }
        if let Some(interval) = &job.interval {
            sheet.write_string(row, 12, truncate_cell(interval))?;
        }
        sheet.write_string(row, 13, truncate_cell(&job.search_term))?;
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    workbook.save(path)?;
    info!("Saved {} jobs to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ResultTable {
        let mut table = ResultTable::new();
        table.append_tagged(
            "PMO Lead",
            vec![JobPosting {
                title: "PMO Lead, \"Transformation\"".to_string(),
                company: "Acme".to_string(),
                location: "London".to_string(),
                site: "indeed".to_string(),
                job_url: "https://example.com/1".to_string(),
                description: "line one\nline two".to_string(),
                min_amount: Some(55_000.0),
                ..Default::default()
            }],
        );
        table
    }

    #[test]
    fn test_csv_has_header_and_quotes_fields() {
        let csv = String::from_utf8(to_csv(&table()).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), JobPosting::COLUMNS.join(","));
        assert!(csv.contains("\"PMO Lead, \"\"Transformation\"\"\""));
        assert!(csv.contains("55000"));
        assert!(csv.trim_end().ends_with("PMO Lead"));
    }

    #[test]
    fn test_csv_of_empty_table_is_header_only() {
        let csv = String::from_utf8(to_csv(&ResultTable::new()).unwrap()).unwrap();
        assert_eq!(csv.trim_end(), JobPosting::COLUMNS.join(","));
    }

    #[test]
    fn test_csv_round_trips_through_reader() {
        let bytes = to_csv(&table()).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let rows: Vec<JobPosting> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "line one\nline two");
        assert_eq!(rows[0].search_term, "PMO Lead");
    }

    #[test]
    fn test_truncate_cell_limits_length() {
        let long = "x".repeat(XLSX_MAX_CELL_CHARS + 10);
        assert_eq!(truncate_cell(&long).chars().count(), XLSX_MAX_CELL_CHARS);
        assert_eq!(truncate_cell("short"), "short");
    }

    #[test]
    fn test_write_xlsx_creates_file() {
        let dir = std::env::temp_dir().join(format!("jobsearch-export-{}", uuid::Uuid::new_v4()));
        let path = dir.join("jobs.xlsx");

        write_xlsx(&table(), &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
        let _ = std::fs::remove_dir_all(dir);
    }
}
