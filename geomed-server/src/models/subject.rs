//! Subject input types

use serde::{Deserialize, Serialize};

/// Input for one prediction: who to analyze and what they publish on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectQuery {
    pub name: String,
    pub email: String,
    pub hospital: String,
    pub pubmed_topic: String,
}

/// One data row of an uploaded batch sheet.
///
/// Field names map to the sheet's required column headers; the tabular
/// reader validates header presence before any row is deserialized.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRow {
    #[serde(rename = "Firstname")]
    pub firstname: String,
    #[serde(rename = "Lastname")]
    pub lastname: String,
    #[serde(rename = "Email ID")]
    pub email: String,
    #[serde(rename = "Hospital Affiliation")]
    pub hospital: String,
    #[serde(rename = "PubMed Article Title")]
    pub pubmed_topic: String,
}
