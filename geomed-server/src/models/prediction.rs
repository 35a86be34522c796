//! Prediction data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::SubjectQuery;

/// Affiliation evidence gathered from PubMed for one subject.
///
/// Invariant: `found == false` implies `affiliation_signals` is empty and
/// `publication_count == 0`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PubMedEvidence {
    pub found: bool,
    pub publication_count: usize,
    /// Title-cased country names seen in the fetched article records,
    /// deduplicated and sorted.
    pub affiliation_signals: Vec<String>,
    /// Present when the lookup itself failed (transport or decode). Degraded
    /// evidence is a normal outcome, not an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PubMedEvidence {
    /// Evidence for a search that matched nothing.
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Evidence degraded by a transport or decode failure.
    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Typed attributes recovered from the model's fixed-label response.
///
/// Always fully populated: every field carries either a parsed value or its
/// documented fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedAttributes {
    pub country: String,
    pub city: Option<String>,
    pub confidence: f64,
    pub reasoning: String,
    pub is_doctor: bool,
    pub specialty: Option<String>,
    pub profile_url: Option<String>,
}

/// A persisted prediction with full provenance. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub hospital: String,
    pub pubmed_topic: String,
    pub predicted_country: String,
    pub city: Option<String>,
    pub confidence_score: f64,
    /// Human-readable evidence sources, in contribution order.
    pub sources: Vec<String>,
    pub reasoning: String,
    pub is_doctor: bool,
    pub specialty: Option<String>,
    pub public_profile_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl PredictionRecord {
    /// Assemble a new record with a fresh id and the current UTC time.
    pub fn new(
        query: &SubjectQuery,
        attributes: PredictedAttributes,
        sources: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: query.name.clone(),
            email: query.email.clone(),
            hospital: query.hospital.clone(),
            pubmed_topic: query.pubmed_topic.clone(),
            predicted_country: attributes.country,
            city: attributes.city,
            confidence_score: attributes.confidence,
            sources,
            reasoning: attributes.reasoning,
            is_doctor: attributes.is_doctor,
            specialty: attributes.specialty,
            public_profile_url: attributes.profile_url,
            timestamp: Utc::now(),
        }
    }
}
