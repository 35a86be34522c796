//! Configuration resolution for geomed-server
//!
//! LLM settings resolve with ENV → TOML priority, mirroring the data folder
//! ladder in geomed-common. The base URL and model have compiled defaults;
//! the API key does not, and startup fails with guidance when it is missing.

use geomed_common::config::TomlConfig;
use geomed_common::{Error, Result};
use tracing::{info, warn};

use crate::services::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Resolved LLM service settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// Resolve LLM settings from environment and TOML config.
///
/// **Priority:** ENV → TOML → compiled default (key has no default).
pub fn resolve_llm_settings(toml_config: &TomlConfig) -> Result<LlmSettings> {
    let llm_toml = toml_config.llm.as_ref();

    let env_key = std::env::var("GEOMED_LLM_API_KEY")
        .ok()
        .filter(|key| is_valid_key(key));
    let toml_key = llm_toml
        .and_then(|llm| llm.api_key.clone())
        .filter(|key| is_valid_key(key));

    // Warn if multiple sources (potential misconfiguration)
    let mut sources = Vec::new();
    if env_key.is_some() {
        sources.push("environment");
    }
    if toml_key.is_some() {
        sources.push("TOML");
    }
    if sources.len() > 1 {
        warn!(
            "LLM API key found in multiple sources: {}. Using environment (highest priority).",
            sources.join(", ")
        );
    }

    let api_key = if let Some(key) = env_key {
        info!("LLM API key loaded from environment variable");
        key
    } else if let Some(key) = toml_key {
        info!("LLM API key loaded from TOML config");
        key
    } else {
        return Err(Error::Config(
            "LLM API key not configured. Please configure using one of:\n\
             1. Environment: GEOMED_LLM_API_KEY=your-key-here\n\
             2. TOML config: ~/.config/geomed/config.toml ([llm] api_key = \"your-key\")"
                .to_string(),
        ));
    };

    let base_url = std::env::var("GEOMED_LLM_BASE_URL")
        .ok()
        .or_else(|| llm_toml.and_then(|llm| llm.base_url.clone()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let model = std::env::var("GEOMED_LLM_MODEL")
        .ok()
        .or_else(|| llm_toml.and_then(|llm| llm.model.clone()))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    Ok(LlmSettings {
        api_key,
        base_url,
        model,
    })
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_validation() {
        assert!(is_valid_key("sk-abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    fn test_missing_key_is_a_config_error() {
        // No env var set in test processes that don't export it; an empty
        // TOML must then fail with guidance.
        if std::env::var("GEOMED_LLM_API_KEY").is_ok() {
            return;
        }
        let err = resolve_llm_settings(&TomlConfig::default()).unwrap_err();
        assert!(err.to_string().contains("GEOMED_LLM_API_KEY"));
    }
}
