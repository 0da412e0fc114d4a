//! Editor configuration
//!
//! Every field has a default, so an empty object (or no object at all)
//! yields a working local setup.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How the store creates-or-updates a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpsertStrategy {
    /// Look the id up, then update or create
    #[default]
    CheckThenWrite,
    /// One insert-or-replace PUT keyed by id
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub log_capacity: usize,
    pub no_channel_label: String,
    pub unknown_channel_label: String,
    pub upsert_strategy: UpsertStrategy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api/v1".to_string(),
            request_timeout_ms: 30_000,
            log_capacity: 500,
            no_channel_label: "채널없음".to_string(),
            unknown_channel_label: "unknown".to_string(),
            upsert_strategy: UpsertStrategy::CheckThenWrite,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("apiBaseUrl is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!("apiBaseUrl must be http(s): {url}")));
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::Invalid("logCapacity must be positive".into()));
        }
        Ok(())
    }
}
