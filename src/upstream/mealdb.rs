//! Recipe search through TheMealDB

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use super::fetch_json;
use crate::models::Meal;
use crate::{FlavorFinderError, Result};

pub const SERVICE: &str = "mealdb";

#[async_trait]
pub trait RecipeSearch: Send + Sync {
    /// A blank query is rejected with `InvalidInput` before any network call
    async fn search(&self, query: &str) -> Result<Vec<Meal>>;
}

pub struct MealDbClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    meals: Option<Vec<UpstreamMeal>>,
}

#[derive(Debug, Deserialize)]
struct UpstreamMeal {
    #[serde(rename = "idMeal", default)]
    id: Option<String>,
    #[serde(rename = "strMeal", default)]
    name: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(flatten)]
    details: Map<String, Value>,
}

impl From<UpstreamMeal> for Meal {
    fn from(meal: UpstreamMeal) -> Self {
        Meal::normalized(meal.id, meal.name, meal.thumbnail, meal.details)
    }
}

impl MealDbClient {
    pub fn new(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl RecipeSearch for MealDbClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<Meal>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FlavorFinderError::invalid_input("Recipe query cannot be empty"));
        }

        let url = format!(
            "{}/search.php?s={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query)
        );
        let request = self.client.get(url).timeout(self.timeout);

        match fetch_json::<SearchResponse>(SERVICE, request).await {
            Ok(response) => {
                let meals: Vec<Meal> = response
                    .meals
                    .unwrap_or_default()
                    .into_iter()
                    .map(Meal::from)
                    .collect();
                info!("Found {} meals for '{}'", meals.len(), query);
                Ok(meals)
            }
            Err(err @ FlavorFinderError::MalformedUpstreamPayload { .. }) => {
                warn!("Ignoring recipe payload: {}", err);
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }
}
