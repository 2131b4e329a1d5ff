//! Lead discovery pipeline.
//!
//! Turns a sparse request (sector + optional location/keyword + result cap)
//! into a deduplicated, bounded list of business leads: one LLM call
//! synthesizes diverse search queries, a budgeted executor runs them against
//! a business-directory search service, and a two-tier identity engine
//! merges the results in discovery order.
//!
//! External services are traits ([`QueryGenerator`], [`BusinessSearch`]) so
//! every stage runs under test with mocks and no network.

pub mod budget;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod executor;
pub mod synthesizer;
pub mod traits;
pub mod types;

// Re-exports for clean API
pub use budget::RunBudget;
pub use config::EngineConfig;
pub use dedup::LeadBook;
pub use engine::{LeadEngine, RunError};
pub use executor::ExecutionReport;
pub use traits::{BusinessSearch, QueryGenerator};
pub use types::{
    CandidateQuery, Lead, QuerySource, RawBusinessRecord, RunReport, SearchRequest, Sector,
};
