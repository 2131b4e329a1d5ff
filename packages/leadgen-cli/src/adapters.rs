//! Adapters wiring the REST clients into the core pipeline traits.

use anyhow::{Context, Result};
use apify_client::{ApifyClient, PlaceItem};
use async_trait::async_trait;
use leadgen::{BusinessSearch, QueryGenerator, RawBusinessRecord};
use openai_client::{ChatRequest, Message, OpenAIClient};

/// Query-phrase generation backed by the OpenAI chat completions API.
pub struct OpenAiGenerator {
    client: OpenAIClient,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl QueryGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .chat_completion(ChatRequest {
                model: self.model.clone(),
                messages: vec![
                    Message::system("You generate short map-search phrases for finding businesses."),
                    Message::user(prompt),
                ],
                temperature: Some(0.7),
                max_tokens: Some(200),
            })
            .await
            .context("OpenAI chat completion failed")?;
        Ok(response.content)
    }
}

/// Business search backed by the Apify Google Places crawler actor.
pub struct ApifySearch {
    client: ApifyClient,
}

impl ApifySearch {
    pub fn new(client: ApifyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BusinessSearch for ApifySearch {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<RawBusinessRecord>> {
        let places = self
            .client
            .search_places(query, limit)
            .await
            .with_context(|| format!("Places crawl failed for query {:?}", query))?;
        Ok(places.into_iter().map(place_to_record).collect())
    }
}

fn place_to_record(place: PlaceItem) -> RawBusinessRecord {
    RawBusinessRecord {
        name: place.title,
        address: place.address,
        phone: place.phone,
        website: place.website,
        email: place.email,
        rating: place.total_score,
        review_count: place.reviews_count,
        category: place.category_name,
        map_url: place.url,
        query: String::new(), // tagged by the executor
    }
}
