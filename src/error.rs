//! Error types for the movie script studio

use thiserror::Error;

/// Result type alias for studio operations
pub type Result<T> = std::result::Result<T, StudioError>;

#[derive(Error, Debug)]
pub enum StudioError {

    // =============================
    // Pipeline Errors
    // =============================

    /// Provider rejected the call. Displays as the raw response body so
    /// JSON error payloads survive the trip through a fault.
    #[error("{body}")]
    Upstream { status: u16, body: String },

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Agent error: {0}")]
    AgentError(String),

    #[error("Tool error: {0}")]
    ToolError(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
