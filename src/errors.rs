//! Error types for surgassist
//!
//! Startup errors (credential, malformed knowledge base) are fatal to the
//! session; per-interaction errors are contained at the call site.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the assistant
#[derive(Error, Debug)]
pub enum AssistantError {
    /// No API key configured for the hosted completion service
    #[error("{var} not found. Set it in the environment or in the [llm] section of the config file")]
    MissingCredential { var: String },

    /// Knowledge base file exists but could not be parsed
    #[error("Malformed knowledge base at {path}: {source}")]
    MalformedKnowledgeBase {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Knowledge base parsed but violates a lookup invariant
    #[error("Invalid knowledge base: {0}")]
    InvalidKnowledgeBase(String),

    /// Embedding model errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector index errors
    #[error("Index error: {0}")]
    Index(String),

    /// Hosted completion API errors
    #[error("LLM API error: {0}")]
    LlmApiError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Resources requested before initialization ran
    #[error("Assistant is not initialized")]
    NotInitialized,

    /// Initialization already failed for this process
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Convert anyhow errors to AssistantError
impl From<anyhow::Error> for AssistantError {
    fn from(err: anyhow::Error) -> Self {
        AssistantError::Generic(format!("{:#}", err))
    }
}
