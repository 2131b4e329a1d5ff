use serde::{Deserialize, Serialize};

/// Input for the compass/crawler-google-places actor.
///
/// The field names follow the actor's input schema, hence the camelCase
/// renames. Reviews, images and web results are disabled: business contact
/// fields are all the caller consumes, and every extra surface costs credits.
#[derive(Debug, Clone, Serialize)]
pub struct PlacesCrawlerInput {
    #[serde(rename = "searchStringsArray")]
    pub search_strings: Vec<String>,
    #[serde(rename = "maxCrawledPlacesPerSearch")]
    pub max_places_per_search: u32,
    pub language: String,
    #[serde(rename = "includeWebResults")]
    pub include_web_results: bool,
    #[serde(rename = "maxReviews")]
    pub max_reviews: u32,
    #[serde(rename = "maxImages")]
    pub max_images: u32,
}

impl PlacesCrawlerInput {
    pub fn new(query: impl Into<String>, max_places: u32) -> Self {
        Self {
            search_strings: vec![query.into()],
            max_places_per_search: max_places,
            language: "en".to_string(),
            include_web_results: false,
            max_reviews: 0,
            max_images: 0,
        }
    }
}

/// A single place from the crawler's dataset. Any field may be missing
/// except the place title.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceItem {
    pub title: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "totalScore")]
    pub total_score: Option<f64>,
    #[serde(rename = "reviewsCount")]
    pub reviews_count: Option<u32>,
    #[serde(rename = "categoryName")]
    pub category_name: Option<String>,
    pub url: Option<String>,
}

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
}
