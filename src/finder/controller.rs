//! Explicit state machine behind the restaurant finder.
//!
//! The controller never performs I/O itself. Transitions that start work
//! hand back a ticket or [`FetchRequest`]; the caller runs the work and
//! reports the outcome. Every cycle bumps a generation counter so that
//! outcomes belonging to a superseded cycle are dropped instead of
//! overwriting newer results.

use tracing::{debug, info, warn};

use super::geolocation::GeolocationError;
use super::pagination::Paginator;
use super::retry::{FetchRequest, RetryPolicy};
use super::state::{DistanceFilter, FinderState, LocationSource, Phase};
use crate::Result;
use crate::models::{Coordinates, Discovery, Restaurant};

/// Handed out by [`FinderController::begin_locating`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateTicket {
    generation: u64,
}

/// The visible slice of the filtered list
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub items: Vec<&'a Restaurant>,
    pub page: usize,
    /// Number of matching entries before this page
    pub offset: usize,
    pub total_pages: usize,
    /// Entries passing the distance filter across all pages
    pub total_matching: usize,
}

#[derive(Debug, Clone)]
pub struct FinderController {
    state: FinderState,
    policy: RetryPolicy,
    paginator: Paginator,
    generation: u64,
}

impl FinderController {
    #[must_use]
    pub fn new(policy: RetryPolicy, paginator: Paginator) -> Self {
        Self {
            state: FinderState::default(),
            policy,
            paginator,
            generation: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &FinderState {
        &self.state
    }

    /// Start a fresh cycle: on first display and on manual retry.
    pub fn begin_locating(&mut self) -> LocateTicket {
        self.generation += 1;
        self.state.phase = Phase::Locating;
        self.state.page = 1;
        self.state.error = None;
        self.state.notice = None;
        debug!("Locating, generation {}", self.generation);
        LocateTicket {
            generation: self.generation,
        }
    }

    /// Feed the geolocation outcome. A failure is not fatal: it becomes a
    /// notice and the fetch proceeds at the fallback coordinates.
    pub fn location_resolved(
        &mut self,
        ticket: LocateTicket,
        outcome: std::result::Result<Coordinates, GeolocationError>,
    ) -> Option<FetchRequest> {
        if ticket.generation != self.generation || self.state.phase != Phase::Locating {
            debug!("Dropping stale location from generation {}", ticket.generation);
            return None;
        }
        match outcome {
            Ok(at) => Some(self.start_fetch(at, LocationSource::Device, 1)),
            Err(err) => {
                warn!("Geolocation failed: {}", err);
                self.state.notice = Some(err.to_string());
                Some(self.start_fetch(self.policy.fallback, LocationSource::Fallback, 1))
            }
        }
    }

    /// Skip geolocation and fetch at the fallback coordinates.
    pub fn use_default_location(&mut self) -> FetchRequest {
        self.generation += 1;
        self.state.page = 1;
        self.state.error = None;
        self.state.notice = None;
        self.start_fetch(self.policy.fallback, LocationSource::Fallback, 1)
    }

    /// Feed the outcome of `request`. Returns the follow-up request when
    /// the retry policy schedules the fallback fetch.
    pub fn restaurants_loaded(
        &mut self,
        request: &FetchRequest,
        outcome: Result<Discovery>,
    ) -> Option<FetchRequest> {
        let current = matches!(
            self.state.phase,
            Phase::Loading { at, source } if at == request.at && source == request.source
        );
        if request.generation != self.generation || !current {
            debug!(
                "Dropping stale restaurant response from generation {}",
                request.generation
            );
            return None;
        }

        match outcome {
            Ok(discovery) => {
                let label = match request.source {
                    LocationSource::Device => discovery.area.to_string(),
                    LocationSource::Fallback => format!("Default Location ({})", discovery.area),
                };
                info!(
                    "Loaded {} restaurants for {}",
                    discovery.restaurants.len(),
                    label
                );
                self.state.restaurants = discovery.restaurants;
                self.state.location_label = Some(label);
                self.state.user_location = Some(request.at);
                self.state.page = 1;
                self.state.error = None;
                self.state.phase = Phase::Success;
                None
            }
            Err(err) => {
                warn!("Restaurant fetch failed: {}", err);
                let message = err.user_message();
                match self.policy.fallback_after(request) {
                    Some(next) => {
                        self.state.notice = Some(format!("{message} - showing default location"));
                        self.state.phase = Phase::Loading {
                            at: next.at,
                            source: next.source,
                        };
                        Some(next)
                    }
                    None => {
                        self.state.error = Some(message);
                        self.state.phase = Phase::Error;
                        None
                    }
                }
            }
        }
    }

    pub fn set_max_distance(&mut self, filter: DistanceFilter) {
        self.state.max_distance = filter;
        self.state.page = 1;
    }

    /// Returns false when already on the last page
    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.state.page + 1)
    }

    /// Returns false when already on the first page
    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.state.page.saturating_sub(1))
    }

    /// Jump to `page`, clamped to the available pages. Returns whether
    /// the page changed.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let clamped = self.paginator.clamp(page, self.filtered().len());
        let changed = clamped != self.state.page;
        self.state.page = clamped;
        changed
    }

    /// Restaurants passing the distance filter, nearest first
    #[must_use]
    pub fn filtered(&self) -> Vec<&Restaurant> {
        let filter = self.state.max_distance;
        self.state
            .restaurants
            .iter()
            .filter(|r| filter.admits(r))
            .collect()
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.paginator.page_count(self.filtered().len())
    }

    #[must_use]
    pub fn current_page(&self) -> PageView<'_> {
        let filtered = self.filtered();
        let total_matching = filtered.len();
        PageView {
            items: self.paginator.page(&filtered, self.state.page).to_vec(),
            page: self.state.page,
            offset: (self.state.page - 1) * self.paginator.page_size(),
            total_pages: self.paginator.page_count(total_matching),
            total_matching,
        }
    }

    fn start_fetch(&mut self, at: Coordinates, source: LocationSource, attempt: u32) -> FetchRequest {
        self.state.phase = Phase::Loading { at, source };
        FetchRequest {
            generation: self.generation,
            at,
            source,
            attempt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlavorFinderError;
    use crate::models::AreaLabel;

    fn fallback() -> Coordinates {
        Coordinates::new(6.5244, 3.3792).unwrap()
    }

    fn device() -> Coordinates {
        Coordinates::new(9.0765, 7.3986).unwrap()
    }

    fn controller() -> FinderController {
        FinderController::new(RetryPolicy::new(fallback()), Paginator::new(6))
    }

    fn restaurant(id: u32, distance_meters: Option<u32>) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            name: format!("Restaurant {id}"),
            address: "Address not available".into(),
            lat: None,
            lon: None,
            distance_meters,
            rating: None,
        }
    }

    fn discovery(area: &str, restaurants: Vec<Restaurant>) -> Discovery {
        Discovery {
            area: AreaLabel::new(area),
            restaurants,
        }
    }

    #[test]
    fn test_device_location_success() {
        let mut controller = controller();
        let ticket = controller.begin_locating();
        assert_eq!(controller.state().phase, Phase::Locating);
        assert!(controller.state().is_busy());

        let request = controller.location_resolved(ticket, Ok(device())).unwrap();
        assert_eq!(request.source, LocationSource::Device);
        assert_eq!(request.at, device());

        let follow_up = controller.restaurants_loaded(
            &request,
            Ok(discovery("Abuja", vec![restaurant(1, Some(300))])),
        );
        assert!(follow_up.is_none());
        let state = controller.state();
        assert_eq!(state.phase, Phase::Success);
        assert_eq!(state.location_label.as_deref(), Some("Abuja"));
        assert_eq!(state.user_location, Some(device()));
        assert!(state.notice.is_none());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_permission_denied_uses_fallback_with_notice() {
        let mut controller = controller();
        let ticket = controller.begin_locating();
        let request = controller
            .location_resolved(ticket, Err(GeolocationError::PermissionDenied))
            .unwrap();
        assert_eq!(request.source, LocationSource::Fallback);
        assert_eq!(request.at, fallback());

        controller.restaurants_loaded(&request, Ok(discovery("Lagos", vec![restaurant(1, Some(10))])));
        let state = controller.state();
        assert_eq!(state.phase, Phase::Success);
        assert_eq!(state.location_label.as_deref(), Some("Default Location (Lagos)"));
        assert_eq!(
            state.notice.as_deref(),
            Some("Please enable location permissions")
        );
        assert!(state.error.is_none());
    }

    #[test]
    fn test_failure_retries_once_then_errors() {
        let mut controller = controller();
        let ticket = controller.begin_locating();
        let first = controller.location_resolved(ticket, Ok(device())).unwrap();

        let second = controller
            .restaurants_loaded(&first, Err(FlavorFinderError::no_usable_data("both down")))
            .unwrap();
        assert_eq!(second.source, LocationSource::Fallback);
        assert_eq!(second.attempt, 2);
        assert!(controller.state().is_busy());

        let third = controller.restaurants_loaded(
            &second,
            Err(FlavorFinderError::no_usable_data("still down")),
        );
        assert!(third.is_none());
        let state = controller.state();
        assert_eq!(state.phase, Phase::Error);
        assert_eq!(state.error.as_deref(), Some("Service unavailable"));
        assert!(!state.is_busy());

        // manual retry goes back through geolocation
        controller.begin_locating();
        assert_eq!(controller.state().phase, Phase::Locating);
        assert!(controller.state().error.is_none());
    }

    #[test]
    fn test_fallback_failure_is_not_retried() {
        let mut controller = controller();
        let request = controller.use_default_location();
        let next = controller.restaurants_loaded(
            &request,
            Err(FlavorFinderError::no_usable_data("down")),
        );
        assert!(next.is_none());
        assert_eq!(controller.state().phase, Phase::Error);
    }

    #[test]
    fn test_stale_responses_are_dropped() {
        let mut controller = controller();
        let ticket = controller.begin_locating();
        let old = controller.location_resolved(ticket, Ok(device())).unwrap();

        // user retries before the first fetch returns
        let ticket = controller.begin_locating();
        let fresh = controller.location_resolved(ticket, Ok(device())).unwrap();

        assert!(
            controller
                .restaurants_loaded(&old, Ok(discovery("Old", vec![restaurant(1, None)])))
                .is_none()
        );
        assert!(controller.state().is_busy());
        assert!(controller.state().restaurants.is_empty());

        controller.restaurants_loaded(&fresh, Ok(discovery("New", vec![restaurant(2, None)])));
        assert_eq!(controller.state().location_label.as_deref(), Some("New"));
        assert_eq!(controller.state().restaurants[0].id, "2");

        // a late response after success does not overwrite it either
        controller.restaurants_loaded(&old, Ok(discovery("Old", vec![])));
        assert_eq!(controller.state().location_label.as_deref(), Some("New"));
    }

    #[test]
    fn test_stale_location_is_dropped() {
        let mut controller = controller();
        let stale = controller.begin_locating();
        let _ = controller.use_default_location();
        assert!(controller.location_resolved(stale, Ok(device())).is_none());
    }

    #[test]
    fn test_filter_and_pagination() {
        let mut controller = controller();
        let request = controller.use_default_location();
        let mut restaurants: Vec<Restaurant> =
            (1..=12).map(|i| restaurant(i, Some(i * 100))).collect();
        restaurants.push(restaurant(13, Some(4000)));
        restaurants.push(restaurant(14, None));
        controller.restaurants_loaded(&request, Ok(discovery("Lagos", restaurants)));

        // default 2km: 12 within range, one too far, one unknown
        assert_eq!(controller.filtered().len(), 13);
        assert_eq!(controller.total_pages(), 3);

        assert!(controller.next_page());
        assert!(controller.next_page());
        assert!(!controller.next_page());
        let view = controller.current_page();
        assert_eq!(view.page, 3);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.offset, 12);
        assert_eq!(view.total_matching, 13);

        controller.set_max_distance(DistanceFilter::FiveHundredMeters);
        assert_eq!(controller.state().page, 1);
        assert_eq!(controller.filtered().len(), 6);
        assert!(!controller.prev_page());

        assert!(!controller.go_to_page(42));
        assert_eq!(controller.state().page, 1);
    }
}
