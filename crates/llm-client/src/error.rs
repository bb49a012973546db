//! LLM client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Authentication failed")]
    Unauthorized,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty response from AI service")]
    EmptyResponse,
}

impl LlmError {
    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LlmError::Unauthorized | LlmError::EmptyResponse)
    }
}
