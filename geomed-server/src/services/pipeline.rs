//! Prediction pipeline
//!
//! Sequences the evidence lookup, the inference call, response parsing, and
//! provenance aggregation into one persisted prediction per subject. The
//! ordering is a hard dependency: the prompt embeds the evidence, the parser
//! consumes the response, provenance reflects both.
//!
//! Evidence and inference failures degrade the attributes instead of
//! failing the run; only storage errors propagate to the caller.

use std::sync::Arc;

use crate::models::{PredictionRecord, SubjectQuery};
use crate::services::{provenance, response_parser};
use crate::types::{EvidenceSource, InferenceService, PredictionStore};

/// One-subject inference pipeline with injected collaborators.
pub struct PredictionPipeline {
    evidence: Arc<dyn EvidenceSource>,
    inference: Arc<dyn InferenceService>,
    store: Arc<dyn PredictionStore>,
}

impl PredictionPipeline {
    pub fn new(
        evidence: Arc<dyn EvidenceSource>,
        inference: Arc<dyn InferenceService>,
        store: Arc<dyn PredictionStore>,
    ) -> Self {
        Self {
            evidence,
            inference,
            store,
        }
    }

    /// Run one prediction end to end and persist it.
    ///
    /// The returned record is exactly the value handed to the store; it is
    /// never mutated after persistence.
    pub async fn run(&self, query: &SubjectQuery) -> geomed_common::Result<PredictionRecord> {
        let evidence = self
            .evidence
            .lookup(&query.name, &query.pubmed_topic)
            .await;

        let attributes = match self.inference.infer(query, &evidence).await {
            Ok(raw) => response_parser::parse_attributes(&raw),
            Err(e) => {
                tracing::error!(name = %query.name, error = %e, "AI prediction error");
                response_parser::degraded_attributes(&e.to_string())
            }
        };

        let sources = provenance::build_sources(&evidence, &query.email);
        let record = PredictionRecord::new(query, attributes, sources);

        self.store.save(&record).await?;

        tracing::info!(
            id = %record.id,
            name = %record.name,
            country = %record.predicted_country,
            confidence = record.confidence_score,
            "Prediction persisted"
        );

        Ok(record)
    }
}
