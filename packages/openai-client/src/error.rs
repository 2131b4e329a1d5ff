//! Errors for the chat-completions client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Missing or unusable configuration (API key not set)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request did not complete within the client's timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Connection-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response (rate limit, invalid request, auth)
    #[error("API error: {0}")]
    Api(String),

    /// A 2xx response that carried no completion choices
    #[error("Empty response: no completion choices returned")]
    EmptyResponse,

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}
