//! Batch outcome models

use serde::{Deserialize, Serialize};

use crate::models::PredictionRecord;

/// Row-indexed failure from a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    /// Spreadsheet-style row number (1-based data index plus header row).
    pub row: usize,
    pub error: String,
}

/// Aggregate outcome of one batch upload.
///
/// Invariants: `successful + failed == total_processed`,
/// `results.len() == successful`, `errors.len() == failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<PredictionRecord>,
    pub errors: Vec<RowError>,
}
