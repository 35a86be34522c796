//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk configuration (`config.toml`). Every field is optional; anything
/// missing falls back to an environment variable or a compiled default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Data folder holding the SQLite database
    pub data_dir: Option<String>,
    /// LLM service settings
    pub llm: Option<LlmToml>,
}

/// `[llm]` section of `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmToml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. GEOMED_DATA_DIR environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("GEOMED_DATA_DIR") {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config) = load_toml_config() {
        if let Some(data_dir) = config.data_dir {
            return PathBuf::from(data_dir);
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// Load `config.toml` from the platform config location, if present.
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = find_config_file()?;
    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read config failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse config failed: {}", e)))
}

/// Get configuration file path for the platform.
///
/// Tries the per-user config directory first (`~/.config/geomed/config.toml`
/// on Linux), then the system-wide `/etc/geomed/config.toml`.
fn find_config_file() -> Result<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("geomed").join("config.toml")) {
        if path.exists() {
            return Ok(path);
        }
    }

    let system_config = PathBuf::from("/etc/geomed/config.toml");
    if system_config.exists() {
        return Ok(system_config);
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default data folder
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("geomed"))
        .unwrap_or_else(|| PathBuf::from("./geomed_data"))
}

/// Database file inside the resolved data folder
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join("geomed.db")
}
