//! Prediction services
//!
//! Leaf-first: `pubmed_client` gathers evidence, `llm_client` generates the
//! fixed-label response, `response_parser` and `provenance` reduce it to
//! typed data, and `pipeline` orchestrates one persisted prediction per
//! subject. `batch_runner` applies the pipeline row by row with per-row
//! error isolation, and `tabular` handles CSV upload/download.

pub mod batch_runner;
pub mod llm_client;
pub mod pipeline;
pub mod provenance;
pub mod pubmed_client;
pub mod response_parser;
pub mod tabular;

pub use llm_client::LlmClient;
pub use pipeline::PredictionPipeline;
pub use pubmed_client::PubMedClient;
