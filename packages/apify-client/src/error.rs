//! Error types for the Apify client.

use thiserror::Error;

/// Result type for Apify client operations.
pub type Result<T> = std::result::Result<T, ApifyError>;

/// Apify client errors.
#[derive(Debug, Error)]
pub enum ApifyError {
    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API error (non-2xx response, rate limit, invalid token)
    #[error("Apify API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Actor run finished in a non-success state
    #[error("Actor run ended with status {0}")]
    RunFailed(String),

    /// Actor run never finished within the polling budget
    #[error("Actor run {run_id} still not finished after {polls} status polls")]
    RunTimedOut { run_id: String, polls: u32 },
}
