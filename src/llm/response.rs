//! Completion response types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for completion calls
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Response from the completion provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// The response text
    pub content: String,

    /// Token usage information (if available)
    pub usage: Option<TokenUsage>,
}

impl Completion {
    /// Create a completion with no usage information
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }
}

/// Token usage information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}
