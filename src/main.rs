use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::warn;

use flavorfinder::finder::{
    DistanceFilter, FinderController, FinderSession, FixedGeolocator, Paginator, PositionOptions,
    RemoteRestaurantSource, RetryPolicy, view,
};
use flavorfinder::upstream::{
    self, ExchangeRateApiClient, ExchangeRateSource, MealDbClient, RecipeSearch,
};
use flavorfinder::{Coordinates, ExchangeRates, FlavorFinderConfig, RestaurantSource, logging, web};

#[derive(Parser)]
#[command(
    name = "flavorfinder",
    version,
    about = "Find recipes, nearby restaurants and NGN/USD rates"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// List restaurants around a position
    Nearby {
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Skip location lookup and use the configured default location
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        default_location: bool,

        /// Maximum distance in meters: 500, 1000, 2000 or 5000
        #[arg(long, default_value_t = 2000)]
        distance: u32,

        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Query a running FlavorFinder server instead of the upstreams
        #[arg(long)]
        server: Option<String>,
    },

    /// Search recipes by name, with rough calorie and cost estimates
    Recipes {
        query: String,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Convert an amount of the base currency into USD
    Exchange {
        #[arg(long, default_value_t = 1.0)]
        amount: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = FlavorFinderConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            web::run(&config).await
        }
        Command::Nearby {
            lat,
            lon,
            default_location,
            distance,
            page,
            server,
        } => {
            let Some(filter) = DistanceFilter::from_meters(distance) else {
                bail!("Unsupported distance {distance}m, pick one of 500, 1000, 2000, 5000");
            };
            let position = match (lat, lon) {
                (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)?),
                _ => None,
            };
            let nearby = Nearby {
                position,
                default_location,
                filter,
                page,
            };
            let client = upstream::http_client(&config.upstream)?;
            match server {
                Some(url) => {
                    let source = RemoteRestaurantSource::new(client, url, config.upstream.timeout());
                    nearby.run(&config, source).await
                }
                None => {
                    let source = flavorfinder::RestaurantAggregator::from_config(&config, client);
                    nearby.run(&config, source).await
                }
            }
        }
        Command::Recipes { query, page } => search_recipes(&config, &query, page).await,
        Command::Exchange { amount } => convert(&config, amount).await,
    }
}

struct Nearby {
    position: Option<Coordinates>,
    default_location: bool,
    filter: DistanceFilter,
    page: usize,
}

impl Nearby {
    async fn run<S: RestaurantSource>(self, config: &FlavorFinderConfig, source: S) -> Result<()> {
        let controller = FinderController::new(
            RetryPolicy::new(config.search.fallback()?),
            Paginator::new(config.search.page_size),
        );
        let options = PositionOptions::with_timeout(config.search.geolocation_timeout());
        let mut session =
            FinderSession::new(controller, FixedGeolocator(self.position), source, options);

        if self.default_location {
            session.use_default_location().await;
        } else {
            session.refresh().await;
        }

        let controller = session.controller_mut();
        controller.set_max_distance(self.filter);
        controller.go_to_page(self.page);
        print!("{}", view::render(controller));
        Ok(())
    }
}

/// Queries this short are not sent upstream
const MIN_RECIPE_QUERY_CHARS: usize = 3;

async fn search_recipes(config: &FlavorFinderConfig, query: &str, page: usize) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        println!("No recipes found");
        return Ok(());
    }
    if query.chars().count() < MIN_RECIPE_QUERY_CHARS {
        println!("Type at least {MIN_RECIPE_QUERY_CHARS} characters to search recipes");
        return Ok(());
    }

    let client = upstream::http_client(&config.upstream)?;
    let search = MealDbClient::new(
        client.clone(),
        config.upstream.mealdb_url.clone(),
        config.upstream.timeout(),
    );
    let (meals, rates) = futures::join!(search.search(query), latest_rates_or_fallback(config, client));
    let meals = meals.context("Failed to fetch recipes")?;

    if meals.is_empty() {
        println!("No recipes found for \"{query}\"");
        return Ok(());
    }

    let paginator = Paginator::new(config.search.page_size);
    let page = paginator.clamp(page, meals.len());
    for meal in paginator.page(&meals, page) {
        let cost = meal.estimated_cost();
        let usd = rates.to_usd(f64::from(cost))?;
        println!("{:>6}  {}", meal.id, meal.name);
        println!(
            "        {} ingredients, ~{} kcal, {} {cost} (~{usd:.2} USD)",
            meal.ingredients().len(),
            meal.estimated_calories(),
            rates.base,
        );
    }
    println!(
        "Page {page} of {} ({} recipes)",
        paginator.page_count(meals.len()),
        meals.len()
    );
    Ok(())
}

async fn latest_rates_or_fallback(
    config: &FlavorFinderConfig,
    client: reqwest::Client,
) -> ExchangeRates {
    let source = ExchangeRateApiClient::new(
        client,
        config.upstream.exchange_url.clone(),
        config.exchange.base_currency.clone(),
        config.upstream.timeout(),
    );
    match source.latest().await {
        Ok(rates) => rates,
        Err(e) => {
            warn!("Using fallback exchange rate: {}", e);
            ExchangeRates::fallback(
                &config.exchange.base_currency,
                config.exchange.fallback_usd_rate,
                Utc::now(),
            )
        }
    }
}

async fn convert(config: &FlavorFinderConfig, amount: f64) -> Result<()> {
    let client = upstream::http_client(&config.upstream)?;
    let rates = latest_rates_or_fallback(config, client).await;

    let usd = rates.to_usd(amount)?;
    println!(
        "{amount:.2} {} = {usd:.4} USD (rates from {})",
        rates.base, rates.last_updated
    );
    Ok(())
}
