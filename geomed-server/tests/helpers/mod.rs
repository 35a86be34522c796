//! Test helper utilities
//!
//! Stub pipeline collaborators shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use geomed_server::models::{PredictionRecord, PubMedEvidence, SubjectQuery};
use geomed_server::services::llm_client::LlmError;
use geomed_server::services::pipeline::PredictionPipeline;
use geomed_server::types::{EvidenceSource, InferenceService, PredictionStore};

/// Canned model response covering every label.
pub const GOOD_RESPONSE: &str = "COUNTRY: Scotland\n\
CITY: Edinburgh\n\
CONFIDENCE: 85\n\
REASONING: Hospital and email domain both point to Edinburgh.\n\
IS_DOCTOR: yes\n\
SPECIALTY: Cardiology\n\
PROFILE_URL: Not found";

/// Evidence stub returning a fixed value.
pub struct StubEvidence(pub PubMedEvidence);

#[async_trait]
impl EvidenceSource for StubEvidence {
    async fn lookup(&self, _name: &str, _topic: &str) -> PubMedEvidence {
        self.0.clone()
    }
}

/// Inference stub returning a fixed response or a network error.
pub struct StubInference(pub Result<String, String>);

#[async_trait]
impl InferenceService for StubInference {
    async fn infer(
        &self,
        _query: &SubjectQuery,
        _evidence: &PubMedEvidence,
    ) -> Result<String, LlmError> {
        self.0.clone().map_err(LlmError::Network)
    }
}

/// In-memory store; fails for records whose email contains the marker.
#[derive(Default)]
pub struct MemoryStore {
    pub saved: Mutex<Vec<PredictionRecord>>,
    pub fail_marker: Option<String>,
}

impl MemoryStore {
    pub fn failing_for(marker: &str) -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            fail_marker: Some(marker.to_string()),
        }
    }
}

#[async_trait]
impl PredictionStore for MemoryStore {
    async fn save(&self, record: &PredictionRecord) -> geomed_common::Result<()> {
        if let Some(marker) = &self.fail_marker {
            if record.email.contains(marker) {
                return Err(geomed_common::Error::Internal(
                    "storage unavailable".to_string(),
                ));
            }
        }
        self.saved.lock().await.push(record.clone());
        Ok(())
    }
}

pub fn found_evidence() -> PubMedEvidence {
    PubMedEvidence {
        found: true,
        publication_count: 3,
        affiliation_signals: vec!["United Kingdom".to_string()],
        error: None,
    }
}

pub fn subject() -> SubjectQuery {
    SubjectQuery {
        name: "Dr. Jane Smith".to_string(),
        email: "j.smith@nhs.uk".to_string(),
        hospital: "Royal Infirmary of Edinburgh".to_string(),
        pubmed_topic: "cardiac imaging".to_string(),
    }
}

pub fn make_pipeline(
    evidence: PubMedEvidence,
    response: Result<String, String>,
    store: Arc<MemoryStore>,
) -> PredictionPipeline {
    PredictionPipeline::new(
        Arc::new(StubEvidence(evidence)),
        Arc::new(StubInference(response)),
        store,
    )
}
