//! UI state for the restaurant finder

use crate::models::{Coordinates, Restaurant};

/// Where the coordinates of a fetch came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Device,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Locating,
    Loading {
        at: Coordinates,
        source: LocationSource,
    },
    Success,
    Error,
}

/// User-selectable maximum distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceFilter {
    FiveHundredMeters,
    OneKilometer,
    #[default]
    TwoKilometers,
    FiveKilometers,
}

impl DistanceFilter {
    pub const ALL: [DistanceFilter; 4] = [
        DistanceFilter::FiveHundredMeters,
        DistanceFilter::OneKilometer,
        DistanceFilter::TwoKilometers,
        DistanceFilter::FiveKilometers,
    ];

    #[must_use]
    pub fn meters(self) -> u32 {
        match self {
            DistanceFilter::FiveHundredMeters => 500,
            DistanceFilter::OneKilometer => 1000,
            DistanceFilter::TwoKilometers => 2000,
            DistanceFilter::FiveKilometers => 5000,
        }
    }

    #[must_use]
    pub fn from_meters(meters: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.meters() == meters)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DistanceFilter::FiveHundredMeters => "500m",
            DistanceFilter::OneKilometer => "1km",
            DistanceFilter::TwoKilometers => "2km",
            DistanceFilter::FiveKilometers => "5km",
        }
    }

    /// Restaurants without a known distance always pass
    #[must_use]
    pub fn admits(self, restaurant: &Restaurant) -> bool {
        restaurant
            .distance_meters
            .is_none_or(|meters| meters <= self.meters())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinderState {
    pub phase: Phase,
    /// Sorted nearest first, replaced wholesale on every successful fetch
    pub restaurants: Vec<Restaurant>,
    pub location_label: Option<String>,
    /// Informational message kept alongside results, e.g. why the
    /// default location is shown
    pub notice: Option<String>,
    pub error: Option<String>,
    pub max_distance: DistanceFilter,
    /// 1-based
    pub page: usize,
    pub user_location: Option<Coordinates>,
}

impl Default for FinderState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            restaurants: Vec::new(),
            location_label: None,
            notice: None,
            error: None,
            max_distance: DistanceFilter::default(),
            page: 1,
            user_location: None,
        }
    }
}

impl FinderState {
    /// Locating or loading; retry controls are disabled meanwhile
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Locating | Phase::Loading { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at_distance(distance_meters: Option<u32>) -> Restaurant {
        Restaurant {
            id: "1".into(),
            name: "Test".into(),
            address: "Somewhere".into(),
            lat: None,
            lon: None,
            distance_meters,
            rating: None,
        }
    }

    #[rstest]
    #[case(DistanceFilter::FiveHundredMeters, Some(500), true)]
    #[case(DistanceFilter::FiveHundredMeters, Some(501), false)]
    #[case(DistanceFilter::OneKilometer, Some(0), true)]
    #[case(DistanceFilter::TwoKilometers, Some(4999), false)]
    #[case(DistanceFilter::FiveKilometers, Some(4999), true)]
    #[case(DistanceFilter::FiveHundredMeters, None, true)]
    fn test_filter_admits(
        #[case] filter: DistanceFilter,
        #[case] distance: Option<u32>,
        #[case] admitted: bool,
    ) {
        assert_eq!(filter.admits(&at_distance(distance)), admitted);
    }

    #[test]
    fn test_filter_round_trip_and_default() {
        assert_eq!(DistanceFilter::default().meters(), 2000);
        assert_eq!(DistanceFilter::from_meters(1000), Some(DistanceFilter::OneKilometer));
        assert_eq!(DistanceFilter::from_meters(750), None);
        assert_eq!(DistanceFilter::FiveKilometers.label(), "5km");
    }

    #[test]
    fn test_initial_state() {
        let state = FinderState::default();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.page, 1);
        assert!(!state.is_busy());
    }
}
