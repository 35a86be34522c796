//! PubMed E-utilities client
//!
//! Gathers best-effort affiliation evidence for an author/topic pair via the
//! esearch → efetch flow. A failed lookup degrades to empty evidence with an
//! error note; this client never fails past its boundary, and absence of
//! evidence is a normal outcome for the caller.

use serde::Deserialize;
use std::time::Duration;

use crate::models::PubMedEvidence;
use crate::types::EvidenceSource;

const EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const USER_AGENT: &str = "GeoMed/0.1.0 (healthcare professional location inference)";

/// Max articles fetched per lookup. Bounds efetch latency and payload size.
const MAX_ARTICLES: usize = 5;

/// Country names and aliases scanned for in fetched article records.
const COUNTRY_VOCABULARY: &[&str] = &[
    "united states",
    "usa",
    "u.s.a",
    "china",
    "united kingdom",
    "uk",
    "germany",
    "france",
    "japan",
    "canada",
    "australia",
    "india",
    "italy",
    "spain",
    "brazil",
    "netherlands",
    "switzerland",
    "sweden",
    "south korea",
    "singapore",
    "israel",
];

#[derive(Debug, Deserialize)]
struct EsearchResponse {
    esearchresult: EsearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

/// PubMed API client
pub struct PubMedClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl PubMedClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_base_url(EUTILS_BASE_URL)
    }

    /// Client against a non-default E-utilities endpoint (tests, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    async fn lookup_inner(&self, author: &str, topic: &str) -> Result<PubMedEvidence, reqwest::Error> {
        let search_url = format!("{}/esearch.fcgi", self.base_url);
        let term = format!("{}[Author] AND {}", author, topic);
        let retmax = MAX_ARTICLES.to_string();
        let params = [
            ("db", "pubmed"),
            ("term", term.as_str()),
            ("retmode", "json"),
            ("retmax", retmax.as_str()),
        ];

        tracing::debug!(author = %author, topic = %topic, "Querying PubMed esearch");

        let search: EsearchResponse = self
            .http_client
            .get(&search_url)
            .query(&params)
            .send()
            .await?
            .json()
            .await?;

        let pmids = search.esearchresult.idlist;
        if pmids.is_empty() {
            return Ok(PubMedEvidence::not_found());
        }

        // Fetch full records and scan them for country mentions.
        let fetch_url = format!("{}/efetch.fcgi", self.base_url);
        let ids = pmids.join(",");
        let fetch_params = [("db", "pubmed"), ("id", ids.as_str()), ("retmode", "xml")];

        let body = self
            .http_client
            .get(&fetch_url)
            .query(&fetch_params)
            .send()
            .await?
            .text()
            .await?;

        let affiliation_signals = extract_country_signals(&body);

        tracing::info!(
            author = %author,
            publications = pmids.len(),
            signals = affiliation_signals.len(),
            "PubMed evidence gathered"
        );

        Ok(PubMedEvidence {
            found: true,
            publication_count: pmids.len(),
            affiliation_signals,
            error: None,
        })
    }
}

#[async_trait::async_trait]
impl EvidenceSource for PubMedClient {
    async fn lookup(&self, name: &str, topic: &str) -> PubMedEvidence {
        match self.lookup_inner(name, topic).await {
            Ok(evidence) => evidence,
            Err(e) => {
                tracing::error!(author = %name, error = %e, "PubMed search error");
                PubMedEvidence::degraded(e.to_string())
            }
        }
    }
}

/// Scan fetched article text for known country mentions.
///
/// Case-insensitive; matches are title-cased, deduplicated, and sorted.
fn extract_country_signals(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut signals: Vec<String> = COUNTRY_VOCABULARY
        .iter()
        .copied()
        .filter(|country| lowered.contains(country))
        .map(title_case)
        .collect();

    signals.sort();
    signals.dedup();
    signals
}

/// Capitalize each alphabetic run: "south korea" → "South Korea",
/// "u.s.a" → "U.S.A".
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut boundary = true;

    for ch in s.chars() {
        if ch.is_alphabetic() {
            if boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            boundary = false;
        } else {
            out.push(ch);
            boundary = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_words_and_abbreviations() {
        assert_eq!(title_case("united states"), "United States");
        assert_eq!(title_case("south korea"), "South Korea");
        assert_eq!(title_case("u.s.a"), "U.S.A");
        assert_eq!(title_case("uk"), "Uk");
    }

    #[test]
    fn test_extract_signals_case_insensitive() {
        let text = "<Affiliation>Department of Cardiology, Oxford, UNITED KINGDOM</Affiliation>";
        let signals = extract_country_signals(text);
        assert!(signals.contains(&"United Kingdom".to_string()));
    }

    #[test]
    fn test_extract_signals_deduplicates() {
        let text = "Germany ... germany ... GERMANY";
        assert_eq!(extract_country_signals(text), vec!["Germany".to_string()]);
    }

    #[test]
    fn test_extract_signals_empty_for_unknown_text() {
        assert!(extract_country_signals("no geography here").is_empty());
    }

    #[test]
    fn test_degraded_evidence_reports_error_without_signals() {
        let evidence = PubMedEvidence::degraded("connection refused");
        assert!(!evidence.found);
        assert_eq!(evidence.publication_count, 0);
        assert!(evidence.affiliation_signals.is_empty());
        assert_eq!(evidence.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_client_creation() {
        let client = PubMedClient::new();
        assert!(client.is_ok());
    }
}
