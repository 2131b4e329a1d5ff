/// Tuning parameters for a discovery run.
///
/// The similarity threshold and the call-ceiling multiplier are cost/quality
/// trade-offs with no single right value, so they are configuration rather
/// than constants.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Cap on the number of synthesized queries per run.
    pub max_queries: usize,
    /// Hard ceiling on external search calls = multiplier x max_queries.
    pub call_ceiling_multiplier: usize,
    /// Name-similarity threshold for the fuzzy dedup tier, in [0, 1].
    pub name_similarity_threshold: f64,
    /// Concurrent in-flight search calls, clamped to [1, 4].
    pub search_concurrency: usize,
    /// Model used for query-phrase generation.
    pub llm_model: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_queries: 5,
            call_ceiling_multiplier: 2,
            name_similarity_threshold: 0.85,
            search_concurrency: 2,
            llm_model: "gpt-4o-mini".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_max_queries(mut self, max_queries: usize) -> Self {
        self.max_queries = max_queries.max(1);
        self
    }

    pub fn with_call_ceiling_multiplier(mut self, multiplier: usize) -> Self {
        self.call_ceiling_multiplier = multiplier.max(1);
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.name_similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_search_concurrency(mut self, concurrency: usize) -> Self {
        self.search_concurrency = concurrency.clamp(1, 4);
        self
    }

    pub fn with_llm_model(mut self, model: impl Into<String>) -> Self {
        self.llm_model = model.into();
        self
    }

    /// Worst-case external search calls permitted in one run.
    pub fn call_ceiling(&self) -> u32 {
        (self.max_queries * self.call_ceiling_multiplier).max(1) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bound_the_run() {
        let config = EngineConfig::default();
        assert_eq!(config.max_queries, 5);
        assert_eq!(config.call_ceiling(), 10);
        assert_eq!(config.search_concurrency, 2);
    }

    #[test]
    fn builders_clamp_out_of_range_values() {
        let config = EngineConfig::default()
            .with_search_concurrency(16)
            .with_similarity_threshold(1.5)
            .with_max_queries(0);

        assert_eq!(config.search_concurrency, 4);
        assert_eq!(config.name_similarity_threshold, 1.0);
        assert_eq!(config.max_queries, 1);
    }
}
