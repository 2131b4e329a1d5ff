// Command-line entry point for the lead discovery pipeline

mod adapters;
mod config;

use anyhow::{bail, Context, Result};
use apify_client::ApifyClient;
use clap::Parser;
use leadgen::{LeadEngine, RunError, SearchRequest, Sector};
use openai_client::OpenAIClient;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapters::{ApifySearch, OpenAiGenerator};
use config::Config;

/// Discover business leads for a sector and location.
#[derive(Debug, Parser)]
#[command(name = "leadgen", version, about)]
struct Args {
    /// Industry sector, e.g. "Healthcare" or "IT & Technology"
    #[arg(long)]
    sector: String,

    #[arg(long)]
    country: Option<String>,

    /// State or province
    #[arg(long)]
    state: Option<String>,

    /// City or suburb
    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    postcode: Option<String>,

    /// Free-text keyword refining query generation, e.g. "Dermatologist"
    #[arg(long)]
    keyword: Option<String>,

    /// Cap on output leads; also bounds external search calls
    #[arg(long, default_value_t = 10)]
    max_results: u32,

    /// Write leads as JSON to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn into_request(self) -> Result<SearchRequest> {
        let Some(sector) = Sector::parse(&self.sector) else {
            bail!(
                "Unrecognized sector {:?}. Valid sectors: {}",
                self.sector,
                Sector::ALL.map(|s| s.name()).join(", ")
            );
        };
        Ok(SearchRequest {
            sector,
            country: self.country,
            state: self.state,
            city: self.city,
            postcode: self.postcode,
            keyword: self.keyword,
            max_results: self.max_results,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,leadgen=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let output = args.output.clone();
    let request = args.into_request()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let generator = OpenAiGenerator::new(
        OpenAIClient::new(config.openai_api_key.clone()),
        config.engine.llm_model.clone(),
    );
    let search = ApifySearch::new(ApifyClient::new(config.apify_token.clone()));
    let engine = LeadEngine::new(generator, search).with_config(config.engine);

    let (leads, failure) = match engine.run(request).await {
        Ok(report) => {
            for lead in &report.leads {
                tracing::info!(name = %lead.name, "Found lead");
            }
            tracing::info!(
                leads = report.leads.len(),
                queries = report.queries.len(),
                calls = report.calls_attempted,
                "Run complete"
            );
            (report.leads, None)
        }
        Err(RunError::SearchUnavailable { leads, attempted }) => {
            tracing::error!(attempted, "Search service unreachable for every query");
            (leads, Some(anyhow::anyhow!("search service unreachable")))
        }
        Err(e @ RunError::InvalidRequest(_)) => return Err(e.into()),
    };

    let json = serde_json::to_string_pretty(&leads).context("Failed to serialize leads")?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), count = leads.len(), "Leads written");
        }
        None => println!("{}", json),
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
