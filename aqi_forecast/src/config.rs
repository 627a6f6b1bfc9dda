//! Forecaster configuration file support.
//!
//! Settings are read from TOML. Every section and field has a default, so an
//! empty file is a valid configuration.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable holding the remote API credential
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Complete forecaster configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default)]
    pub forecasting: ForecastingSettings,
    #[serde(default)]
    pub alerts: AlertSettings,
}

/// Remote forecaster settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Credential; `None` or empty disables the remote path
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Upper bound on one remote call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Most recent points sent upstream
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Usable points required before the remote is tried
    #[serde(default = "default_min_history")]
    pub min_history: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            history_limit: default_history_limit(),
            min_history: default_min_history(),
            temperature: default_temperature(),
        }
    }
}

impl RemoteSettings {
    /// The credential, if one is set and non-empty
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Local model settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastingSettings {
    #[serde(default = "default_method")]
    pub default_method: String,
    /// Seed for the random source behind default forecasts
    #[serde(default)]
    pub seed: Option<u64>,
    /// When false the local models are treated as unavailable
    #[serde(default = "default_local_models")]
    pub local_models: bool,
}

impl Default for ForecastingSettings {
    fn default() -> Self {
        Self {
            default_method: default_method(),
            seed: None,
            local_models: default_local_models(),
        }
    }
}

/// Alert settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSettings {
    /// Predictions strictly above this raise an alert
    #[serde(default = "default_threshold")]
    pub threshold: u16,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek/deepseek-chat-v3.1:free".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_history_limit() -> usize {
    90
}

fn default_min_history() -> usize {
    7
}

fn default_temperature() -> f32 {
    0.2
}

fn default_method() -> String {
    "ensemble".to_string()
}

fn default_local_models() -> bool {
    true
}

fn default_threshold() -> u16 {
    150
}

impl ForecastConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ForecastError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ForecastError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Override the API key from the environment
    pub fn apply_env(self) -> Self {
        let value = std::env::var(API_KEY_ENV).ok();
        self.with_api_key_override(value)
    }

    /// Replace the API key with `value` when it is non-empty
    pub fn with_api_key_override(mut self, value: Option<String>) -> Self {
        if let Some(key) = value.filter(|key| !key.trim().is_empty()) {
            self.remote.api_key = Some(key);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ForecastConfig::from_toml_str("").unwrap();
        assert_eq!(config, ForecastConfig::default());
        assert_eq!(config.remote.timeout_secs, 60);
        assert_eq!(config.remote.history_limit, 90);
        assert_eq!(config.forecasting.default_method, "ensemble");
        assert!(config.forecasting.local_models);
        assert_eq!(config.alerts.threshold, 150);
    }

    #[test]
    fn test_blank_credential_is_absent() {
        let config = ForecastConfig::from_toml_str("[remote]\napi_key = \"  \"\n").unwrap();
        assert_eq!(config.remote.credential(), None);
    }

    #[test]
    fn test_env_override() {
        let config = ForecastConfig::default()
            .with_api_key_override(Some("sk-test".to_string()));
        assert_eq!(config.remote.credential(), Some("sk-test"));

        let kept = config.clone().with_api_key_override(Some(String::new()));
        assert_eq!(kept.remote.credential(), Some("sk-test"));
    }

    #[test]
    fn test_malformed_document() {
        let err = ForecastConfig::from_toml_str("[alerts]\nthreshold = \"high\"\n").unwrap_err();
        assert!(matches!(err, ForecastError::Config(_)));
    }
}
