//! Configuration management for surgassist
//!
//! TOML-based configuration with defaults and validation.
//! Location: ~/.surgassist/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{AssistantError, Result};
use crate::models::{DEFAULT_GEMINI_URL, DEFAULT_MODEL};
use crate::rag::qdrant::{DEFAULT_COLLECTION, DEFAULT_QDRANT_URL};
use crate::rag::{DEFAULT_EMBEDDING_MODEL, DEFAULT_TOP_K};

/// Environment variable holding the completion API key by default
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Knowledge base location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    pub path: String,
}

/// Hosted completion service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    /// Environment variable consulted first for the API key
    pub api_key_env: String,
    /// Fallback API key stored in the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

/// Vector index backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    Memory,
    Qdrant,
}

/// Retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub embedding_model: String,
    pub backend: IndexBackend,
    pub qdrant_url: String,
    pub collection: String,
}

/// Terminal display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color_output: bool,
    pub show_progress: bool,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            path: "data/surgical_knowledge.json".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key: None,
            temperature: 0.0,
            timeout_secs: 60,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            backend: IndexBackend::Memory,
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: true,
            show_progress: true,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AssistantError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| AssistantError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location if present, else built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// ~/.surgassist/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".surgassist").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.knowledge_base.path.trim().is_empty() {
            return Err(AssistantError::ConfigError(
                "knowledge_base.path must not be empty".to_string(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(AssistantError::ConfigError(
                "llm.model must not be empty".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(AssistantError::ConfigError(
                "llm.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.llm.timeout_secs == 0 {
            return Err(AssistantError::ConfigError(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(AssistantError::ConfigError(
                "retrieval.top_k must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| AssistantError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AssistantError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AssistantError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Resolve the API key: environment variable first, then config file
    pub fn api_key(&self) -> Result<String> {
        self.api_key_from(|var| std::env::var(var).ok())
    }

    /// Credential lookup with an injectable environment
    pub fn api_key_from<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &String| !key.trim().is_empty();

        lookup(&self.llm.api_key_env)
            .filter(present)
            .or_else(|| self.llm.api_key.clone().filter(present))
            .ok_or_else(|| AssistantError::MissingCredential {
                var: self.llm.api_key_env.clone(),
            })
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Knowledge base file path
    pub fn knowledge_base_path(&self) -> PathBuf {
        Self::expand_path(&self.knowledge_base.path)
    }
}
