//! The filter pipeline: magnitude floor, rolling time window, and region
//! substring, ANDed, followed by a magnitude-descending sort.
//!
//! The pipeline is a pure function of (events, filters, now). It never
//! mutates the raw batch, so relaxing a filter restores previously hidden
//! events without another fetch. The sort is stable: events with equal
//! magnitudes keep their feed order.

use chrono::{DateTime, Utc};
use geoview_types::{Event, FilterParameters};

/// Apply the three filter predicates and sort the survivors by magnitude,
/// strongest first.
pub fn filter_events(
    events: &[Event],
    filters: &FilterParameters,
    now: DateTime<Utc>,
) -> Vec<Event> {
    // A window that underflows the calendar keeps everything.
    let cutoff = now.checked_sub_signed(filters.time_window.duration());

    let mut selected: Vec<Event> = events
        .iter()
        .filter(|event| passes(event, filters, cutoff))
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    selected
}

fn passes(event: &Event, filters: &FilterParameters, cutoff: Option<DateTime<Utc>>) -> bool {
    if event.magnitude < filters.min_magnitude {
        return false;
    }
    if let Some(cutoff) = cutoff
        && event.time_occurred < cutoff
    {
        return false;
    }
    filters.region.matches(&event.place)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use geoview_types::{EventId, EventKind, EventStatus, Position, RegionFilter, TimeWindow};

    fn event(id: &str, magnitude: f64, age: Duration, place: &str) -> Event {
        Event {
            id: EventId::from(id),
            position: Position {
                longitude: 0.0,
                latitude: 0.0,
                depth_km: 10.0,
            },
            magnitude,
            time_occurred: Utc::now().checked_sub_signed(age).unwrap(),
            title: format!("M {magnitude:.1} - {place}"),
            place: place.to_owned(),
            kind: EventKind::Earthquake,
            status: EventStatus::Automatic,
            detail_url: String::new(),
        }
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn magnitude_floor_keeps_boundary_events() {
        let now = Utc::now();
        let events = [
            event("weak", 2.1, Duration::minutes(5), "Nevada"),
            event("boundary", 3.0, Duration::minutes(5), "Nevada"),
            event("strong", 5.5, Duration::minutes(5), "Nevada"),
        ];
        let filters = FilterParameters {
            min_magnitude: 3.0,
            ..FilterParameters::default()
        };

        let selected = filter_events(&events, &filters, now);
        assert_eq!(ids(&selected), vec!["strong", "boundary"]);
    }

    #[test]
    fn time_window_excludes_older_events() {
        let now = Utc::now();
        let events = [
            event("recent", 1.0, Duration::hours(1), "Alaska"),
            event("stale", 1.0, Duration::hours(7), "Alaska"),
        ];
        let filters = FilterParameters {
            time_window: TimeWindow::SixHours,
            ..FilterParameters::default()
        };

        let selected = filter_events(&events, &filters, now);
        assert_eq!(ids(&selected), vec!["recent"]);
    }

    #[test]
    fn default_window_is_twenty_four_hours() {
        let now = Utc::now();
        let events = [
            event("today", 1.0, Duration::hours(23), "Chile"),
            event("yesterday", 1.0, Duration::hours(25), "Chile"),
        ];

        let selected = filter_events(&events, &FilterParameters::default(), now);
        assert_eq!(ids(&selected), vec!["today"]);
    }

    #[test]
    fn region_substring_is_case_insensitive() {
        let now = Utc::now();
        let events = [
            event("ca", 1.0, Duration::minutes(5), "Southern California"),
            event("ak", 1.0, Duration::minutes(5), "Alaska Peninsula"),
        ];
        let filters = FilterParameters {
            region: RegionFilter::parse("CALIFORNIA"),
            ..FilterParameters::default()
        };

        let selected = filter_events(&events, &filters, now);
        assert_eq!(ids(&selected), vec!["ca"]);
    }

    #[test]
    fn predicates_are_anded() {
        let now = Utc::now();
        let events = [
            event("keeps", 4.0, Duration::minutes(30), "Japan region"),
            event("wrong_region", 4.0, Duration::minutes(30), "Chile"),
            event("too_weak", 2.0, Duration::minutes(30), "Japan region"),
            event("too_old", 4.0, Duration::hours(2), "Japan region"),
        ];
        let filters = FilterParameters {
            min_magnitude: 3.0,
            time_window: TimeWindow::OneHour,
            region: RegionFilter::parse("japan"),
        };

        let selected = filter_events(&events, &filters, now);
        assert_eq!(ids(&selected), vec!["keeps"]);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let now = Utc::now();
        let events = [
            event("small", 2.0, Duration::minutes(1), "Nevada"),
            event("tie_first", 4.0, Duration::minutes(2), "Nevada"),
            event("big", 6.0, Duration::minutes(3), "Nevada"),
            event("tie_second", 4.0, Duration::minutes(4), "Nevada"),
        ];

        let selected = filter_events(&events, &FilterParameters::default(), now);
        assert_eq!(ids(&selected), vec!["big", "tie_first", "tie_second", "small"]);
    }

    #[test]
    fn raw_batch_is_untouched() {
        let now = Utc::now();
        let events = [
            event("hidden", 1.0, Duration::minutes(5), "Nevada"),
            event("shown", 5.0, Duration::minutes(5), "Nevada"),
        ];
        let strict = FilterParameters {
            min_magnitude: 4.0,
            ..FilterParameters::default()
        };

        let narrow = filter_events(&events, &strict, now);
        assert_eq!(ids(&narrow), vec!["shown"]);

        // Relaxing the filter over the same batch restores the hidden event.
        let wide = filter_events(&events, &FilterParameters::default(), now);
        assert_eq!(wide.len(), 2);
    }
}
