//! Run orchestration: validate, synthesize, execute, cap.

use thiserror::Error;
use tracing::info;

use crate::budget::RunBudget;
use crate::config::EngineConfig;
use crate::dedup::LeadBook;
use crate::executor;
use crate::synthesizer;
use crate::traits::{BusinessSearch, QueryGenerator};
use crate::types::{Lead, RunReport, SearchRequest};

/// Run-level failures. Per-query problems never appear here: generation
/// failure falls back to templates and individual search failures are
/// absorbed. Partial success is always preferred over total failure.
#[derive(Debug, Error)]
pub enum RunError {
    /// Rejected before any external call is made.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Every attempted search call failed. Carries whatever was collected
    /// so callers can tell "found nothing" from "could not search".
    #[error("Search service unreachable: all {attempted} calls failed")]
    SearchUnavailable { leads: Vec<Lead>, attempted: usize },
}

/// The lead discovery pipeline. External services are injected as traits so
/// the whole run is testable without network access.
pub struct LeadEngine<G, S> {
    generator: G,
    search: S,
    config: EngineConfig,
}

impl<G: QueryGenerator, S: BusinessSearch> LeadEngine<G, S> {
    pub fn new(generator: G, search: S) -> Self {
        Self {
            generator,
            search,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Execute one discovery run end to end.
    pub async fn run(&self, request: SearchRequest) -> Result<RunReport, RunError> {
        if request.max_results == 0 {
            return Err(RunError::InvalidRequest(
                "maxResults must be at least 1".to_string(),
            ));
        }
        if request.location_fields().is_empty() {
            info!("No location fields given, search scope will be broad");
        }

        info!(
            sector = %request.sector,
            keyword = request.trimmed_keyword().unwrap_or_default(),
            max_results = request.max_results,
            "Starting lead discovery run"
        );

        let queries = synthesizer::synthesize(&request, &self.config, &self.generator).await;

        let budget = RunBudget::new(request.max_results, self.config.call_ceiling());
        let mut book = LeadBook::new(request.sector, self.config.name_similarity_threshold);

        let report = executor::execute(
            &queries,
            &self.search,
            &budget,
            request.max_results,
            self.config.search_concurrency,
            &mut book,
        )
        .await;

        let leads = book.into_capped(request.max_results as usize);

        if report.systemic_failure() {
            return Err(RunError::SearchUnavailable {
                leads,
                attempted: report.calls_attempted,
            });
        }

        info!(
            leads = leads.len(),
            queries = queries.len(),
            calls = report.calls_attempted,
            "Lead discovery run complete"
        );

        Ok(RunReport {
            leads,
            queries,
            calls_attempted: report.calls_attempted,
            calls_failed: report.calls_failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{QuerySource, RawBusinessRecord, Sector};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct PhraseGenerator(&'static str);

    #[async_trait]
    impl QueryGenerator for PhraseGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct DeadGenerator;

    #[async_trait]
    impl QueryGenerator for DeadGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Err(anyhow!("llm timeout"))
        }
    }

    /// Yields `per_call` distinct businesses per call.
    struct StubSearch {
        per_call: usize,
        calls: AtomicUsize,
    }

    impl StubSearch {
        fn new(per_call: usize) -> Self {
            Self {
                per_call,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl BusinessSearch for StubSearch {
        async fn search(&self, query: &str, _limit: u32) -> anyhow::Result<Vec<RawBusinessRecord>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..self.per_call)
                .map(|i| RawBusinessRecord {
                    name: format!("Clinic {}-{}", call, i),
                    phone: Some(format!("+91 44 {:02}{:04}", call, i)),
                    query: query.to_string(),
                    ..Default::default()
                })
                .collect())
        }
    }

    struct DownSearch;

    #[async_trait]
    impl BusinessSearch for DownSearch {
        async fn search(&self, _query: &str, _limit: u32) -> anyhow::Result<Vec<RawBusinessRecord>> {
            Err(anyhow!("connection refused"))
        }
    }

    struct PanicSearch;

    #[async_trait]
    impl BusinessSearch for PanicSearch {
        async fn search(&self, _query: &str, _limit: u32) -> anyhow::Result<Vec<RawBusinessRecord>> {
            panic!("no external call may happen for an invalid request");
        }
    }

    fn chennai_request() -> SearchRequest {
        let mut request = SearchRequest::new(Sector::Healthcare);
        request.city = Some("Chennai".into());
        request.keyword = Some("Dermatologist".into());
        request
    }

    #[tokio::test]
    async fn healthcare_chennai_scenario_stops_early() {
        let engine = LeadEngine::new(
            PhraseGenerator("dermatologists\nskin clinics\nskin specialists\nderm clinics\ncosmetic dermatology"),
            StubSearch::new(5),
        )
        .with_config(EngineConfig::default().with_search_concurrency(1));

        let report = engine.run(chennai_request()).await.unwrap();

        assert_eq!(report.queries.len(), 5);
        assert_eq!(report.queries[0].text, "dermatologists in Chennai");
        assert_eq!(report.leads.len(), 10);
        // 5 unique leads per call: only 2 of 5 queries were needed.
        assert_eq!(report.calls_attempted, 2);
    }

    #[tokio::test]
    async fn output_is_capped_at_max_results() {
        let mut request = chennai_request();
        request.max_results = 7;

        let engine = LeadEngine::new(PhraseGenerator("dermatologists\nskin clinics"), StubSearch::new(20))
            .with_config(EngineConfig::default().with_search_concurrency(1));
        let report = engine.run(request).await.unwrap();

        assert_eq!(report.leads.len(), 7);
    }

    #[tokio::test]
    async fn llm_outage_still_produces_a_result() {
        let engine = LeadEngine::new(DeadGenerator, StubSearch::new(10))
            .with_config(EngineConfig::default().with_search_concurrency(1));

        let report = engine.run(chennai_request()).await.unwrap();

        assert!(!report.queries.is_empty());
        assert!(report.queries.iter().all(|q| q.source == QuerySource::Template));
        assert_eq!(report.leads.len(), 10);
    }

    #[tokio::test]
    async fn total_search_outage_surfaces_with_empty_partial_set() {
        let engine = LeadEngine::new(PhraseGenerator("dermatologists\nskin clinics"), DownSearch);

        let err = engine.run(chennai_request()).await.unwrap_err();

        match err {
            RunError::SearchUnavailable { leads, attempted } => {
                assert!(leads.is_empty());
                assert_eq!(attempted, 2);
            }
            other => panic!("expected SearchUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn zero_max_results_is_rejected_before_any_call() {
        let mut request = chennai_request();
        request.max_results = 0;

        let engine = LeadEngine::new(PhraseGenerator("dermatologists"), PanicSearch);
        let err = engine.run(request).await.unwrap_err();

        assert!(matches!(err, RunError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn country_only_request_is_still_bounded() {
        let mut request = SearchRequest::new(Sector::Healthcare);
        request.country = Some("India".into());
        request.max_results = 20;

        let config = EngineConfig::default()
            .with_max_queries(3)
            .with_call_ceiling_multiplier(1)
            .with_search_concurrency(1);
        let engine = LeadEngine::new(
            PhraseGenerator("hospitals\nclinics\ndoctors\ndentists\nlabs"),
            StubSearch::new(2),
        )
        .with_config(config);

        let report = engine.run(request).await.unwrap();

        assert!(report.queries.len() <= 3);
        assert!(report.calls_attempted <= 3);
        assert!(report.leads.len() <= 20);
        assert!(report
            .queries
            .iter()
            .all(|q| q.text.ends_with("in India")));
    }
}
