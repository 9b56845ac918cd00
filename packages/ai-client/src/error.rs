//! Error types for the gateway client.

use thiserror::Error;

/// Result type for gateway client operations.
pub type Result<T> = std::result::Result<T, AiError>;

/// Gateway client errors.
#[derive(Debug, Error)]
pub enum AiError {
    /// Missing API key or invalid client settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed or timed out before a response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// Gateway answered with a non-2xx status
    #[error("Gateway error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body or tool arguments were not the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// The model answered without invoking the requested tool
    #[error("Model did not call tool `{0}`")]
    NoToolCall(String),
}

impl AiError {
    /// HTTP status of the gateway response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
