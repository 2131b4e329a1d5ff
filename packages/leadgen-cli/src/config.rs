use anyhow::{Context, Result};
use dotenvy::dotenv;
use leadgen::EngineConfig;
use std::env;

/// Credentials and tuning overrides loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub apify_token: String,
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let mut engine = EngineConfig::default();
        if let Some(threshold) = parse_var::<f64>("LEADGEN_SIMILARITY")? {
            engine = engine.with_similarity_threshold(threshold);
        }
        if let Some(multiplier) = parse_var::<usize>("LEADGEN_CALL_MULTIPLIER")? {
            engine = engine.with_call_ceiling_multiplier(multiplier);
        }
        if let Some(max_queries) = parse_var::<usize>("LEADGEN_MAX_QUERIES")? {
            engine = engine.with_max_queries(max_queries);
        }
        if let Some(concurrency) = parse_var::<usize>("LEADGEN_CONCURRENCY")? {
            engine = engine.with_search_concurrency(concurrency);
        }
        if let Ok(model) = env::var("LEADGEN_LLM_MODEL") {
            engine = engine.with_llm_model(model);
        }

        Ok(Self {
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            apify_token: env::var("APIFY_TOKEN").context("APIFY_TOKEN must be set")?,
            engine,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => {
            let parsed = value
                .parse::<T>()
                .with_context(|| format!("{} must be a valid number, got {:?}", name, value))?;
            Ok(Some(parsed))
        }
        Err(_) => Ok(None),
    }
}
