use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::evaluator::{Validation, DEFAULT_TEMPERATURE};
use crate::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// Environment variables checked, in order, for the model API key.
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key is not set (expected one of: {})", API_KEY_VARS.join(", "))]
    MissingApiKey,

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorecardConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub validation: Validation,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report index database. Defaults to `scorecard.db` inside `output_dir`.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_name")]
    pub name: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_model_name() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    45
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ScorecardConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            validation: Validation::default(),
            output_dir: default_output_dir(),
            store_path: None,
        }
    }
}

impl ScorecardConfig {
    /// Loads a YAML config file; a missing `path` yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| self.output_dir.join("scorecard.db"))
    }
}

/// Resolves the model API key from the environment, loading `.env` first if present.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    dotenvy::dotenv().ok(); // load .env if present; ignore if missing
    API_KEY_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingApiKey)
}
