use tracing::instrument;

use super::controller::FinderController;
use super::geolocation::{Geolocator, PositionOptions, locate};
use super::retry::FetchRequest;
use super::state::FinderState;
use crate::aggregator::RestaurantSource;

/// Drives a [`FinderController`] against real collaborators: a position
/// provider and a restaurant source.
pub struct FinderSession<G, S> {
    controller: FinderController,
    geolocator: G,
    source: S,
    options: PositionOptions,
}

impl<G: Geolocator, S: RestaurantSource> FinderSession<G, S> {
    pub fn new(
        controller: FinderController,
        geolocator: G,
        source: S,
        options: PositionOptions,
    ) -> Self {
        Self {
            controller,
            geolocator,
            source,
            options,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &FinderController {
        &self.controller
    }

    /// Filter and page changes go straight to the controller
    pub fn controller_mut(&mut self) -> &mut FinderController {
        &mut self.controller
    }

    /// Full cycle: locate, fetch, and at most one fallback fetch
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> &FinderState {
        let ticket = self.controller.begin_locating();
        let outcome = locate(&self.geolocator, &self.options).await;
        let request = self.controller.location_resolved(ticket, outcome);
        self.run(request).await;
        self.controller.state()
    }

    #[instrument(skip(self))]
    pub async fn use_default_location(&mut self) -> &FinderState {
        let request = self.controller.use_default_location();
        self.run(Some(request)).await;
        self.controller.state()
    }

    async fn run(&mut self, mut next: Option<FetchRequest>) {
        while let Some(request) = next.take() {
            let outcome = self.source.restaurants(request.at).await;
            next = self.controller.restaurants_loaded(&request, outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::finder::{GeolocationError, Paginator, Phase, RetryPolicy};
    use crate::models::{AreaLabel, Coordinates, Discovery, Restaurant};
    use crate::{FlavorFinderError, Result};

    struct Denied;

    #[async_trait]
    impl Geolocator for Denied {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> std::result::Result<Coordinates, GeolocationError> {
            Err(GeolocationError::PermissionDenied)
        }
    }

    struct At(Coordinates);

    #[async_trait]
    impl Geolocator for At {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> std::result::Result<Coordinates, GeolocationError> {
            Ok(self.0)
        }
    }

    /// Answers from a script and records the coordinates it was asked for
    struct Scripted {
        answers: Mutex<Vec<Result<Discovery>>>,
        asked: Mutex<Vec<Coordinates>>,
    }

    impl Scripted {
        fn new(mut answers: Vec<Result<Discovery>>) -> Self {
            answers.reverse();
            Self {
                answers: Mutex::new(answers),
                asked: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RestaurantSource for Scripted {
        async fn restaurants(&self, at: Coordinates) -> Result<Discovery> {
            self.asked.lock().unwrap().push(at);
            self.answers
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(FlavorFinderError::no_usable_data("script exhausted")))
        }
    }

    fn lagos() -> Coordinates {
        Coordinates::new(6.5244, 3.3792).unwrap()
    }

    fn abuja() -> Coordinates {
        Coordinates::new(9.0765, 7.3986).unwrap()
    }

    fn controller() -> FinderController {
        FinderController::new(RetryPolicy::new(lagos()), Paginator::default())
    }

    fn found(area: &str, count: u32) -> Result<Discovery> {
        Ok(Discovery {
            area: AreaLabel::new(area),
            restaurants: (0..count)
                .map(|i| Restaurant {
                    id: i.to_string(),
                    name: format!("Spot {i}"),
                    address: "Address not available".into(),
                    lat: None,
                    lon: None,
                    distance_meters: Some(100 * i),
                    rating: None,
                })
                .collect(),
        })
    }

    #[tokio::test]
    async fn test_permission_denied_shows_default_location() {
        let source = Scripted::new(vec![found("Lagos", 3)]);
        let mut session =
            FinderSession::new(controller(), Denied, source, PositionOptions::default());

        let state = session.refresh().await;
        assert_eq!(state.phase, Phase::Success);
        assert_eq!(state.location_label.as_deref(), Some("Default Location (Lagos)"));
        assert_eq!(
            state.notice.as_deref(),
            Some("Please enable location permissions")
        );
        assert_eq!(state.restaurants.len(), 3);
        assert_eq!(*session.source.asked.lock().unwrap(), vec![lagos()]);
    }

    #[tokio::test]
    async fn test_failure_then_fallback_success() {
        let source = Scripted::new(vec![
            Err(FlavorFinderError::no_usable_data("both down")),
            found("Lagos", 2),
        ]);
        let mut session =
            FinderSession::new(controller(), At(abuja()), source, PositionOptions::default());

        let state = session.refresh().await;
        assert_eq!(state.phase, Phase::Success);
        assert!(state.error.is_none());
        assert_eq!(
            state.notice.as_deref(),
            Some("Service unavailable - showing default location")
        );
        assert_eq!(*session.source.asked.lock().unwrap(), vec![abuja(), lagos()]);
    }

    #[tokio::test]
    async fn test_double_failure_ends_in_error_and_retry_relocates() {
        let source = Scripted::new(vec![
            Err(FlavorFinderError::no_usable_data("down")),
            Err(FlavorFinderError::no_usable_data("down")),
            found("Abuja", 1),
        ]);
        let mut session =
            FinderSession::new(controller(), At(abuja()), source, PositionOptions::default());

        let state = session.refresh().await;
        assert_eq!(state.phase, Phase::Error);
        assert_eq!(state.error.as_deref(), Some("Service unavailable"));
        assert_eq!(session.source.asked.lock().unwrap().len(), 2);

        let state = session.refresh().await;
        assert_eq!(state.phase, Phase::Success);
        assert_eq!(state.location_label.as_deref(), Some("Abuja"));
        assert_eq!(session.source.asked.lock().unwrap()[2], abuja());
    }

    #[tokio::test]
    async fn test_use_default_location_skips_geolocation() {
        let source = Scripted::new(vec![found("Lagos", 0)]);
        let mut session =
            FinderSession::new(controller(), At(abuja()), source, PositionOptions::default());

        let state = session.use_default_location().await;
        assert_eq!(state.phase, Phase::Success);
        assert!(state.restaurants.is_empty());
        assert_eq!(
            session.controller().state().location_label.as_deref(),
            Some("Default Location (Lagos)")
        );
        assert_eq!(*session.source.asked.lock().unwrap(), vec![lagos()]);
    }
}
