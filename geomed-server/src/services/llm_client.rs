//! LLM chat-completion client
//!
//! One request per prediction: a system instruction plus a single user
//! message carrying the subject and the PubMed evidence summary. Every call
//! runs under a fresh session identifier, so predictions never share
//! conversational state and concurrent calls cannot interfere.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::LlmSettings;
use crate::models::{PubMedEvidence, SubjectQuery};
use crate::types::InferenceService;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const SYSTEM_MESSAGE: &str = "You are a medical professional analyzer and geographic expert. \
    When analyzing UK-based professionals, always specify the constituent country (England, \
    Scotland, Wales, or Northern Ireland) rather than just 'United Kingdom'. Analyze healthcare \
    professional data to predict their specific location, verify medical credentials, identify \
    specialties, and suggest profile URLs accurately.";

/// LLM client errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response from model")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    /// Per-call session identifier; never reused across calls.
    user: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Chat-completion API client
pub struct LlmClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: settings.base_url,
            api_key: settings.api_key,
            model: settings.model,
        })
    }
}

#[async_trait::async_trait]
impl InferenceService for LlmClient {
    async fn infer(
        &self,
        query: &SubjectQuery,
        evidence: &PubMedEvidence,
    ) -> Result<String, LlmError> {
        let prompt = build_prompt(query, evidence);
        let session_id = fresh_session_id();

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            user: session_id.clone(),
        };

        tracing::debug!(session_id = %session_id, name = %query.name, "Requesting prediction");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(status.as_u16(), error_text));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        Ok(content)
    }
}

/// Session identifier for one call. Fresh per invocation, so no state or
/// history can leak between subjects.
fn fresh_session_id() -> String {
    format!("country-predict-{}", Uuid::new_v4())
}

/// Build the structured user prompt embedding identity, affiliation, topic,
/// and the evidence summary, with fixed-label output instructions.
fn build_prompt(query: &SubjectQuery, evidence: &PubMedEvidence) -> String {
    let signals = if evidence.affiliation_signals.is_empty() {
        "None".to_string()
    } else {
        evidence.affiliation_signals.join(", ")
    };

    format!(
        "Analyze the following information about a healthcare professional and provide detailed insights:\n\
        \n\
        Name: {name}\n\
        Email: {email}\n\
        Hospital Affiliation: {hospital}\n\
        PubMed Research Topic: {topic}\n\
        \n\
        PubMed Data:\n\
        - Found publications: {found}\n\
        - Number of publications: {count}\n\
        - Affiliations found: {signals}\n\
        \n\
        Based on the above information, provide:\n\
        \n\
        1. **Country**: Most likely country. IMPORTANT: If UK/United Kingdom, specify the constituent country:\n\
        \x20  - England (if in London, Manchester, Birmingham, Oxford, Cambridge, etc.)\n\
        \x20  - Scotland (if in Edinburgh, Glasgow, Aberdeen, etc.)\n\
        \x20  - Wales (if in Cardiff, Swansea, etc.)\n\
        \x20  - Northern Ireland (if in Belfast, etc.)\n\
        \x20  For other countries, provide the country name as normal (e.g., \"United States\", \"Japan\", \"Germany\")\n\
        \n\
        2. **City**: If identifiable from hospital name or email, specify the city (e.g., \"London\", \"Edinburgh\", \"Manchester\"). If not identifiable, respond with \"Not specified\"\n\
        \n\
        3. **Confidence**: Confidence score (0-100)\n\
        \n\
        4. **Reasoning**: Brief reasoning for location prediction (max 2 sentences)\n\
        \n\
        5. **Is Doctor**: Whether this person is a medical doctor (yes/no). Consider:\n\
        \x20  - Name prefix (Dr., MD, Prof., etc.)\n\
        \x20  - Hospital affiliation\n\
        \x20  - Medical research publications\n\
        \x20  - Medical specialty keywords\n\
        \n\
        6. **Specialty**: Medical specialty if identifiable (e.g., Cardiology, Oncology, Neuroscience, Endocrinology, Pediatrics, etc.). Use \"General Practice\" if unclear. Use the PubMed topic and research area to determine specialty.\n\
        \n\
        7. **Profile URL**: If you can infer a likely public profile URL (e.g., hospital staff page, LinkedIn, ResearchGate, Google Scholar), provide it. Format should be a realistic URL pattern like:\n\
        \x20  - Hospital staff directory: https://[hospital-domain]/staff/[name]\n\
        \x20  - Google Scholar: https://scholar.google.com/citations?user=[suggest searching]\n\
        \x20  - ResearchGate: https://www.researchgate.net/profile/[Name]\n\
        \x20  If unsure, respond with \"Not found\"\n\
        \n\
        Format your response EXACTLY as:\n\
        COUNTRY: [country name - e.g., \"England\" not \"United Kingdom\" if in England]\n\
        CITY: [city name or \"Not specified\"]\n\
        CONFIDENCE: [number]\n\
        REASONING: [reasoning]\n\
        IS_DOCTOR: [yes/no]\n\
        SPECIALTY: [specialty name]\n\
        PROFILE_URL: [URL or \"Not found\"]",
        name = query.name,
        email = query.email,
        hospital = query.hospital,
        topic = query.pubmed_topic,
        found = evidence.found,
        count = evidence.publication_count,
        signals = signals,
    )
}
