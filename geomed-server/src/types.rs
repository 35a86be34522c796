//! Collaborator interfaces for the prediction pipeline
//!
//! The pipeline depends on three capabilities, each behind a dyn-safe async
//! trait so the HTTP clients and the SQLite store can be swapped for stubs
//! in tests. Connection lifecycle belongs to whoever constructs the
//! implementations, never to the pipeline itself.

use async_trait::async_trait;

use crate::models::{PredictionRecord, PubMedEvidence, SubjectQuery};
use crate::services::llm_client::LlmError;

/// Bibliographic evidence lookup.
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    /// Best-effort lookup of publications for an author/topic pair.
    ///
    /// Degradation (no matches, transport failure) is reported inside the
    /// returned evidence, never as an error.
    async fn lookup(&self, name: &str, topic: &str) -> PubMedEvidence;
}

/// Probabilistic text-generation capability.
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Request one fixed-label prediction for the subject.
    ///
    /// Exactly one underlying call per invocation; no conversational state
    /// is shared across calls.
    async fn infer(
        &self,
        query: &SubjectQuery,
        evidence: &PubMedEvidence,
    ) -> Result<String, LlmError>;
}

/// Prediction persistence.
#[async_trait]
pub trait PredictionStore: Send + Sync {
    /// Persist a finished record. Records are immutable once saved.
    async fn save(&self, record: &PredictionRecord) -> geomed_common::Result<()>;
}
