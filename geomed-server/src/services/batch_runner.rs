//! Batch prediction runner
//!
//! Applies the prediction pipeline to each uploaded row independently. A row
//! that fails validation or storage is reported with its spreadsheet row
//! number; one row's fault never aborts or affects any other row.

use crate::models::{BatchReport, BatchRow, RowError, SubjectQuery};
use crate::services::pipeline::PredictionPipeline;

/// Reported row numbers are 1-based and account for the header row, so the
/// first data row is row 2 as an operator sees it in a spreadsheet.
const HEADER_ROW_OFFSET: usize = 2;

/// Run the pipeline over every row, sequentially, with per-row isolation.
pub async fn run_batch(pipeline: &PredictionPipeline, rows: &[BatchRow]) -> BatchReport {
    let mut results = Vec::new();
    let mut errors = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + HEADER_ROW_OFFSET;

        let query = match validated_query(row) {
            Some(query) => query,
            None => {
                errors.push(RowError {
                    row: row_number,
                    error: "Empty fields detected".to_string(),
                });
                continue;
            }
        };

        match pipeline.run(&query).await {
            Ok(record) => results.push(record),
            Err(e) => {
                tracing::error!(row = row_number, error = %e, "Error processing batch row");
                errors.push(RowError {
                    row: row_number,
                    error: e.to_string(),
                });
            }
        }
    }

    BatchReport {
        total_processed: rows.len(),
        successful: results.len(),
        failed: errors.len(),
        results,
        errors,
    }
}

/// Pre-flight validation: full name (first + last), email, hospital, and
/// topic must all be non-empty after trimming. Distinct from pipeline
/// failures; an invalid row never reaches the pipeline.
fn validated_query(row: &BatchRow) -> Option<SubjectQuery> {
    let name = format!("{} {}", row.firstname, row.lastname)
        .trim()
        .to_string();
    let email = row.email.trim();
    let hospital = row.hospital.trim();
    let topic = row.pubmed_topic.trim();

    if name.is_empty() || email.is_empty() || hospital.is_empty() || topic.is_empty() {
        return None;
    }

    Some(SubjectQuery {
        name,
        email: email.to_string(),
        hospital: hospital.to_string(),
        pubmed_topic: topic.to_string(),
    })
}
