//! Application configuration
//!
//! JSON config stored under the user config directory. Engine thresholds
//! ride along so deployments can retune the judges without a rebuild.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::analysis::Tuning;

/// Clova Studio connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClovaConfig {
    /// Bearer token; the CLOVA_API_KEY env var overrides the stored value
    pub api_key: String,
    pub base_url: String,
    /// Model for one-shot generation (learning content, feedback)
    pub completion_model: String,
    /// Model for free conversation
    pub chat_model: String,
    pub timeout_secs: u64,
}

impl Default for ClovaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://clovastudio.stream.ntruss.com".to_string(),
            completion_model: "HCX-DASH-002".to_string(),
            chat_model: "HCX-003".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub clova: ClovaConfig,

    /// Analysis thresholds
    pub tuning: Tuning,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clova: ClovaConfig::default(),
            tuning: Tuning::default(),
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from file or create default
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    fn load_from(config_path: PathBuf) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    // Graceful degradation: log warning and use defaults
                    tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                    // Backup corrupt file for debugging
                    let backup_path = config_path.with_extension("json.corrupt");
                    let _ = std::fs::rename(&config_path, &backup_path);
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var("CLOVA_API_KEY") {
            if !key.is_empty() {
                config.clova.api_key = key;
            }
        }

        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let config_path = config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Path to the config file
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("talkcoach/config.json")
}
