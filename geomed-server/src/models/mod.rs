//! Data models for geomed-server

pub mod batch;
pub mod prediction;
pub mod subject;

pub use batch::{BatchReport, RowError};
pub use prediction::{PredictedAttributes, PredictionRecord, PubMedEvidence};
pub use subject::{BatchRow, SubjectQuery};
