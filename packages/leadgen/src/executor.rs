//! Budgeted query execution.
//!
//! Queries run in synthesizer order through an ordered buffered stream:
//! up to `concurrency` calls are in flight at once, but results are folded
//! in query order, so the output never depends on completion timing. The
//! fold happens only on the consumer side of the stream; it is the single
//! synchronization point between workers and the lead set.

use futures::{stream, StreamExt};
use tracing::{info, warn};

use crate::budget::RunBudget;
use crate::dedup::LeadBook;
use crate::traits::BusinessSearch;
use crate::types::{CandidateQuery, RawBusinessRecord};

/// What happened across all attempted search calls in one run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    pub calls_attempted: usize,
    pub calls_failed: usize,
    pub records_fetched: usize,
}

impl ExecutionReport {
    /// Every attempted call failed: the search service is effectively
    /// unreachable for this run.
    pub fn systemic_failure(&self) -> bool {
        self.calls_attempted > 0 && self.calls_failed == self.calls_attempted
    }
}

enum QueryOutcome {
    /// Budget denied the call before it was issued.
    Skipped,
    Fetched {
        query: String,
        records: Vec<RawBusinessRecord>,
    },
    Failed,
}

/// Execute queries against the search service, folding each batch into the
/// book as it arrives. Per-call failures are absorbed and logged; the
/// budget gates every call and the loop short-circuits once the lead
/// target is met.
pub async fn execute(
    queries: &[CandidateQuery],
    search: &dyn BusinessSearch,
    budget: &RunBudget,
    per_call_limit: u32,
    concurrency: usize,
    book: &mut LeadBook,
) -> ExecutionReport {
    let mut report = ExecutionReport::default();

    let outcomes = stream::iter(queries.iter())
        .map(|query| async move {
            if !budget.try_begin_call() {
                return QueryOutcome::Skipped;
            }
            match search.search(&query.text, per_call_limit).await {
                Ok(records) => QueryOutcome::Fetched {
                    query: query.text.clone(),
                    records,
                },
                Err(e) => {
                    warn!(query = %query.text, error = %e, "Search call failed, continuing with next query");
                    QueryOutcome::Failed
                }
            }
        })
        .buffered(concurrency.max(1));
    let mut outcomes = std::pin::pin!(outcomes);

    while let Some(outcome) = outcomes.next().await {
        match outcome {
            QueryOutcome::Skipped => continue,
            QueryOutcome::Failed => {
                report.calls_attempted += 1;
                report.calls_failed += 1;
            }
            QueryOutcome::Fetched { query, records } => {
                report.calls_attempted += 1;
                report.records_fetched += records.len();
                if records.is_empty() {
                    info!(query = %query, "Query returned no records");
                }
                for mut record in records {
                    record.query = query.clone();
                    book.fold(record);
                }
                budget.record_lead_count(book.len() as u32);
                if budget.target_met() {
                    // Drop the stream: unstarted queries never run and
                    // in-flight siblings are cancelled.
                    info!(leads = book.len(), "Lead target met, stopping early");
                    break;
                }
            }
        }
    }

    info!(
        attempted = report.calls_attempted,
        failed = report.calls_failed,
        records = report.records_fetched,
        leads = book.len(),
        "Query execution finished"
    );
    report
}
