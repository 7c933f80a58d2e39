//! Text rendering of the finder state

use std::fmt::Write;

use super::controller::{FinderController, PageView};
use super::state::{DistanceFilter, FinderState, Phase};
use crate::models::Restaurant;

/// "350m away" below one kilometre, "1.2km away" above
#[must_use]
pub fn format_distance(meters: u32) -> String {
    if meters < 1000 {
        format!("{meters}m away")
    } else {
        format!("{:.1}km away", f64::from(meters) / 1000.0)
    }
}

#[must_use]
pub fn heading(state: &FinderState) -> String {
    match &state.location_label {
        Some(label) => format!("Restaurants near {label}"),
        None => "Finding restaurants near you".to_string(),
    }
}

#[must_use]
pub fn status_line(state: &FinderState) -> Option<&'static str> {
    match state.phase {
        Phase::Locating => Some("Detecting your location..."),
        Phase::Loading { .. } => Some("Loading restaurants..."),
        Phase::Idle | Phase::Success | Phase::Error => None,
    }
}

#[must_use]
pub fn empty_message(filter: DistanceFilter) -> String {
    format!("No restaurants found within {}m", filter.meters())
}

#[must_use]
pub fn summary(view: &PageView<'_>) -> String {
    format!(
        "Showing {} of {} restaurants",
        view.items.len(),
        view.total_matching
    )
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "*".repeat(filled), "-".repeat(5 - filled))
}

fn restaurant_line(index: usize, restaurant: &Restaurant) -> String {
    let mut line = format!("{index:>3}. {}", restaurant.name);
    if let Some(rating) = restaurant.rating {
        let _ = write!(line, " [{}]", stars(rating));
    }
    let _ = write!(line, "\n     {}", restaurant.address);
    if let Some(distance) = restaurant.distance_meters {
        let _ = write!(line, " ({})", format_distance(distance));
    }
    line
}

/// Full plain-text page for the terminal
#[must_use]
pub fn render(controller: &FinderController) -> String {
    let state = controller.state();
    let mut out = heading(state);
    out.push('\n');

    if let Some(status) = status_line(state) {
        out.push_str(status);
        out.push('\n');
    }
    if let Some(notice) = &state.notice {
        let _ = writeln!(out, "Note: {notice}");
    }
    if let Some(location) = &state.user_location {
        let _ = writeln!(out, "Searching from {}", location.format_coordinates());
    }

    match state.phase {
        Phase::Error => {
            let message = state.error.as_deref().unwrap_or("Something went wrong");
            let _ = writeln!(out, "Error: {message}");
        }
        Phase::Success => {
            let _ = writeln!(out, "Within {}", state.max_distance.label());
            let view = controller.current_page();
            if view.total_matching == 0 {
                out.push_str(&empty_message(state.max_distance));
                out.push('\n');
            } else {
                for (i, restaurant) in view.items.iter().enumerate() {
                    out.push_str(&restaurant_line(view.offset + i + 1, restaurant));
                    out.push('\n');
                }
                let _ = writeln!(
                    out,
                    "{} (page {}/{})",
                    summary(&view),
                    view.page,
                    view.total_pages
                );
            }
        }
        Phase::Idle | Phase::Locating | Phase::Loading { .. } => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::{Paginator, RetryPolicy};
    use crate::models::{AreaLabel, Coordinates, Discovery};
    use rstest::rstest;

    #[rstest]
    #[case(0, "0m away")]
    #[case(350, "350m away")]
    #[case(999, "999m away")]
    #[case(1000, "1.0km away")]
    #[case(1234, "1.2km away")]
    fn test_format_distance(#[case] meters: u32, #[case] expected: &str) {
        assert_eq!(format_distance(meters), expected);
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(
            empty_message(DistanceFilter::OneKilometer),
            "No restaurants found within 1000m"
        );
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(3), "***--");
        assert_eq!(stars(9), "*****");
    }

    #[test]
    fn test_render_success() {
        let fallback = Coordinates::new(6.5244, 3.3792).unwrap();
        let mut controller = FinderController::new(RetryPolicy::new(fallback), Paginator::default());
        let request = controller.use_default_location();
        controller.restaurants_loaded(
            &request,
            Ok(Discovery {
                area: AreaLabel::new("Lagos"),
                restaurants: vec![Restaurant {
                    id: "1".into(),
                    name: "Mama Put".into(),
                    address: "Allen Avenue".into(),
                    lat: Some(6.5250),
                    lon: Some(3.3800),
                    distance_meters: Some(350),
                    rating: Some(4),
                }],
            }),
        );

        let text = render(&controller);
        assert!(text.contains("Restaurants near Default Location (Lagos)"));
        assert!(text.contains("1. Mama Put [****-]"));
        assert!(text.contains("Allen Avenue (350m away)"));
        assert!(text.contains("Showing 1 of 1 restaurants (page 1/1)"));
    }
}
