use anyhow::Result;
use async_trait::async_trait;

use crate::types::RawBusinessRecord;

/// Trait for LLM text generation (to allow mocking).
///
/// One call per run: the synthesizer sends a single prompt and parses the
/// free-text response into query phrases. Any failure here is recovered
/// locally via the template fallback, never surfaced to the caller.
#[async_trait]
pub trait QueryGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Trait for the business-directory search service (to allow mocking).
///
/// One call per query string. `limit` caps the records the service should
/// crawl for this query. Implementations must tolerate being called
/// concurrently.
#[async_trait]
pub trait BusinessSearch: Send + Sync {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<RawBusinessRecord>>;
}
