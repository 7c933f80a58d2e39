use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, warn};

use crate::aggregator::{RestaurantAggregator, RestaurantSource};
use crate::config::FlavorFinderConfig;
use crate::models::{Coordinates, ExchangeRates, Meal};
use crate::upstream::{self, ExchangeRateApiClient, ExchangeRateSource, MealDbClient, RecipeSearch};
use crate::{FlavorFinderError, Result, VERSION};

const NO_STORE: &str = "no-store, max-age=0";

/// Shared handler dependencies
#[derive(Clone)]
pub struct AppState {
    pub restaurants: Arc<dyn RestaurantSource>,
    pub recipes: Arc<dyn RecipeSearch>,
    pub exchange: Arc<dyn ExchangeRateSource>,
    pub base_currency: String,
    pub fallback_usd_rate: f64,
}

impl AppState {
    /// Wire the real upstream adapters from configuration
    pub fn from_config(config: &FlavorFinderConfig) -> Result<Self> {
        let client = upstream::http_client(&config.upstream)?;
        let restaurants = RestaurantAggregator::from_config(config, client.clone());
        let recipes = MealDbClient::new(
            client.clone(),
            config.upstream.mealdb_url.clone(),
            config.upstream.timeout(),
        );
        let exchange = ExchangeRateApiClient::new(
            client,
            config.upstream.exchange_url.clone(),
            config.exchange.base_currency.clone(),
            config.upstream.timeout(),
        );
        Ok(Self {
            restaurants: Arc::new(restaurants),
            recipes: Arc::new(recipes),
            exchange: Arc::new(exchange),
            base_currency: config.exchange.base_currency.clone(),
            fallback_usd_rate: config.exchange.fallback_usd_rate,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RestaurantQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    /// Older clients send `lng`
    pub lng: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

impl IntoResponse for FlavorFinderError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid coordinates provided" })),
            )
                .into_response()
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": self.user_message(), "restaurants": [] })),
            )
                .into_response()
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/restaurants", get(get_restaurants))
        .route("/recipes", get(get_recipes))
        .route("/exchange", get(get_exchange))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(NO_STORE),
        ))
        .with_state(state)
}

pub async fn health() -> impl IntoResponse {
    Json(Health {
        status: "ok",
        version: VERSION,
    })
}

async fn get_restaurants(
    State(state): State<AppState>,
    query: std::result::Result<Query<RestaurantQuery>, QueryRejection>,
) -> std::result::Result<Response, FlavorFinderError> {
    let Query(query) = query.map_err(|rejection| {
        warn!("Rejected restaurant query string: {}", rejection.body_text());
        FlavorFinderError::invalid_input(rejection.body_text())
    })?;
    let lon = query.lon.as_deref().or(query.lng.as_deref());
    let at = Coordinates::parse(query.lat.as_deref(), lon).inspect_err(|e| {
        warn!("Rejected restaurant query: {}", e);
    })?;

    let discovery = state.restaurants.restaurants(at).await.inspect_err(|e| {
        error!("Restaurant lookup failed: {}", e);
    })?;
    Ok(Json(discovery).into_response())
}

async fn get_recipes(
    State(state): State<AppState>,
    query: std::result::Result<Query<RecipeQuery>, QueryRejection>,
) -> Response {
    let Ok(Query(query)) = query else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid recipe query" })),
        )
            .into_response();
    };
    let q = query.q.unwrap_or_default();
    if q.trim().is_empty() {
        return Json(Vec::<Meal>::new()).into_response();
    }

    match state.recipes.search(&q).await {
        Ok(meals) => Json(meals).into_response(),
        Err(e) => {
            error!("Recipe search for {:?} failed: {}", q, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch recipes" })),
            )
                .into_response()
        }
    }
}

async fn get_exchange(State(state): State<AppState>) -> Response {
    match state.exchange.latest().await {
        Ok(rates) => Json(rates).into_response(),
        Err(e) => {
            error!("Exchange rate lookup failed: {}", e);
            let fallback =
                ExchangeRates::fallback(&state.base_currency, state.fallback_usd_rate, Utc::now());
            (StatusCode::INTERNAL_SERVER_ERROR, Json(fallback)).into_response()
        }
    }
}
