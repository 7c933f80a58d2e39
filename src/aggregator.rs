//! Restaurant discovery aggregation
//!
//! Reverse geocoding and the POI query run concurrently. Their failures are
//! independent: one side failing degrades the answer (default area label or
//! an empty list), only both failing is reported as an error. Raw elements
//! are normalized into [`Restaurant`]s, measured against the caller's
//! position and sorted nearest first.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use rand::RngExt;
use tracing::{error, info, instrument, warn};

use crate::config::FlavorFinderConfig;
use crate::geo;
use crate::models::{AreaLabel, Coordinates, Discovery, RawPointOfInterest, Restaurant};
use crate::upstream::{NominatimClient, OverpassClient, PoiSource, ReverseGeocoder};
use crate::{FlavorFinderError, Result};

/// Anything that can answer "which restaurants are around this point"
#[async_trait]
pub trait RestaurantSource: Send + Sync {
    async fn restaurants(&self, at: Coordinates) -> Result<Discovery>;
}

pub struct RestaurantAggregator {
    geocoder: Arc<dyn ReverseGeocoder>,
    pois: Arc<dyn PoiSource>,
    radius_meters: u32,
    decorative_ratings: bool,
}

impl RestaurantAggregator {
    pub fn new(
        geocoder: Arc<dyn ReverseGeocoder>,
        pois: Arc<dyn PoiSource>,
        radius_meters: u32,
    ) -> Self {
        Self {
            geocoder,
            pois,
            radius_meters,
            decorative_ratings: false,
        }
    }

    /// Attach a random 1-5 rating to every restaurant
    #[must_use]
    pub fn with_decorative_ratings(mut self, enabled: bool) -> Self {
        self.decorative_ratings = enabled;
        self
    }

    /// Wire the Nominatim and Overpass adapters from configuration
    pub fn from_config(config: &FlavorFinderConfig, client: reqwest::Client) -> Self {
        let geocoder = NominatimClient::new(
            client.clone(),
            config.upstream.nominatim_url.clone(),
            config.upstream.geocode_timeout(),
        );
        let pois = OverpassClient::new(
            client,
            config.upstream.overpass_url.clone(),
            config.upstream.poi_timeout(),
        );
        Self::new(Arc::new(geocoder), Arc::new(pois), config.search.radius_meters)
            .with_decorative_ratings(config.search.decorative_ratings)
    }

    #[instrument(skip(self), fields(lat = at.latitude, lon = at.longitude))]
    pub async fn discover(&self, at: Coordinates) -> Result<Discovery> {
        let (area, elements) = futures::join!(
            self.geocoder.reverse_geocode(at),
            self.pois.restaurants_near(at, self.radius_meters)
        );

        let (area, elements) = match (area, elements) {
            (Err(geocode_err), Err(poi_err)) => {
                error!("Both upstreams failed: {}; {}", geocode_err, poi_err);
                return Err(FlavorFinderError::no_usable_data(format!(
                    "{geocode_err}; {poi_err}"
                )));
            }
            (area, elements) => (
                area.unwrap_or_else(|e| {
                    warn!("Reverse geocoding failed, using default area: {}", e);
                    AreaLabel::default()
                }),
                elements.unwrap_or_else(|e| {
                    warn!("POI query failed, returning no restaurants: {}", e);
                    Vec::new()
                }),
            ),
        };

        let mut restaurants = normalize(elements, at);
        if self.decorative_ratings {
            let mut rng = rand::rng();
            for restaurant in &mut restaurants {
                restaurant.rating = Some(rng.random_range(1..=5));
            }
        }

        info!(area = %area, count = restaurants.len(), "Aggregated restaurants");
        Ok(Discovery { area, restaurants })
    }
}

#[async_trait]
impl RestaurantSource for RestaurantAggregator {
    async fn restaurants(&self, at: Coordinates) -> Result<Discovery> {
        self.discover(at).await
    }
}

/// Drop unnamed elements, build addresses and distances, sort nearest first
#[must_use]
pub fn normalize(elements: Vec<RawPointOfInterest>, user: Coordinates) -> Vec<Restaurant> {
    let mut restaurants: Vec<Restaurant> = elements
        .iter()
        .filter_map(|element| {
            let name = element.name()?;
            let position = element.position();
            Some(Restaurant {
                id: element.id.to_string(),
                name: name.to_string(),
                address: element.address(),
                lat: position.map(|p| p.latitude),
                lon: position.map(|p| p.longitude),
                distance_meters: position.map(|p| geo::distance_meters(&user, &p)),
                rating: None,
            })
        })
        .collect();

    sort_by_distance(&mut restaurants);
    restaurants
}

/// Ascending by distance, entries without a distance last (stable)
pub fn sort_by_distance(restaurants: &mut [Restaurant]) {
    restaurants.sort_by(|a, b| match (a.distance_meters, b.distance_meters) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
