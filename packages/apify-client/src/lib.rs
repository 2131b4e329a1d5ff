//! Pure Apify REST API client.
//!
//! A minimal client for the Apify platform API, specialized to the Google
//! Places crawler actor. Supports starting actor runs, polling for
//! completion, and fetching dataset results.
//!
//! # Example
//!
//! ```rust,ignore
//! use apify_client::ApifyClient;
//!
//! let client = ApifyClient::new("your-api-token".into());
//!
//! let places = client.search_places("skin clinics in Chennai", 10).await?;
//! for place in &places {
//!     println!("{}", place.title);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{PlaceItem, PlacesCrawlerInput, RunData};

use serde::de::DeserializeOwned;
use std::time::Duration;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor ID for compass/crawler-google-places.
const GOOGLE_PLACES_CRAWLER: &str = "compass~crawler-google-places";

/// Per-request timeout. Long-polling a run status uses `waitForFinish=60`,
/// so the HTTP timeout must sit above that window.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Status polls allowed per run before giving up. With `waitForFinish=60`
/// each, a wedged run degrades into a per-query failure after ~10 minutes
/// instead of blocking its search call forever.
const MAX_STATUS_POLLS: u32 = 10;

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API host (proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Start a Google Places crawl run. Returns immediately with run metadata.
    pub async fn start_places_run(&self, input: &PlacesCrawlerInput) -> Result<RunData> {
        let url = format!("{}/acts/{}/runs", self.base_url, GOOGLE_PLACES_CRAWLER);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        Ok(api_resp.data)
    }

    /// Poll until a run completes. Uses `waitForFinish=60` for efficient
    /// long-polling; gives up after [`MAX_STATUS_POLLS`] so a wedged run
    /// cannot block the caller indefinitely.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        for poll in 1..=MAX_STATUS_POLLS {
            let url = format!("{}/actor-runs/{}?waitForFinish=60", self.base_url, run_id);
            let resp = self.client.get(&url).bearer_auth(&self.token).send().await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ApifyError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let api_resp: ApiResponse<RunData> = resp.json().await?;
            match api_resp.data.status.as_str() {
                "SUCCEEDED" => return Ok(api_resp.data),
                "FAILED" | "ABORTED" | "TIMED-OUT" => {
                    return Err(ApifyError::RunFailed(api_resp.data.status));
                }
                _ => {
                    tracing::debug!(run_id, poll, status = %api_resp.data.status, "Run still in progress");
                }
            }
        }

        Err(ApifyError::RunTimedOut {
            run_id: run_id.to_string(),
            polls: MAX_STATUS_POLLS,
        })
    }

    /// Fetch dataset items from a completed run.
    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let url = format!("{}/datasets/{}/items?format=json", self.base_url, dataset_id);
        let resp = self.client.get(&url).bearer_auth(&self.token).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let items: Vec<T> = resp.json().await?;
        Ok(items)
    }

    /// Search Google Places end-to-end: start run, poll, fetch results.
    pub async fn search_places(&self, query: &str, max_places: u32) -> Result<Vec<PlaceItem>> {
        tracing::info!(query, max_places, "Starting Google Places crawl");

        let input = PlacesCrawlerInput::new(query, max_places);
        let run = self.start_places_run(&input).await?;
        tracing::info!(run_id = %run.id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        tracing::info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "Run completed, fetching results"
        );

        let places: Vec<PlaceItem> = self
            .get_dataset_items(&completed.default_dataset_id)
            .await?;
        tracing::info!(count = places.len(), "Fetched places");

        Ok(places)
    }
}
