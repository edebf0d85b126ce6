//! Aggregate statistics over the filtered working set.

use chrono::{DateTime, Duration, Utc};
use geoview_types::Event;
use serde::Serialize;

/// Summary numbers for the stats panel, computed over the working set
/// (after filtering), never the raw batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WorkingSetStats {
    /// Number of events in the working set.
    pub total: usize,
    /// Strongest magnitude in the set, `0.0` when empty.
    pub max_magnitude: f64,
    /// Mean magnitude of the set, `0.0` when empty.
    pub average_magnitude: f64,
    /// Events that occurred within the last hour before `now`.
    pub last_hour_count: usize,
}

impl WorkingSetStats {
    /// Compute the summary for one working set.
    pub fn compute(events: &[Event], now: DateTime<Utc>) -> Self {
        let total = events.len();
        if total == 0 {
            return Self::default();
        }

        let mut sum = 0.0_f64;
        let mut count = 0.0_f64;
        for event in events {
            sum += event.magnitude;
            count += 1.0;
        }
        let max_magnitude = events
            .iter()
            .map(|event| event.magnitude)
            .reduce(f64::max)
            .unwrap_or_default();

        let hour_cutoff = now.checked_sub_signed(Duration::hours(1));
        let last_hour_count = hour_cutoff.map_or(total, |cutoff| {
            events
                .iter()
                .filter(|event| event.time_occurred >= cutoff)
                .count()
        });

        Self {
            total,
            max_magnitude,
            average_magnitude: sum / count,
            last_hour_count,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use geoview_types::{EventId, EventKind, EventStatus, Position};

    fn event(magnitude: f64, age: Duration) -> Event {
        Event {
            id: EventId::from("ev"),
            position: Position {
                longitude: 0.0,
                latitude: 0.0,
                depth_km: 10.0,
            },
            magnitude,
            time_occurred: Utc::now().checked_sub_signed(age).unwrap(),
            title: String::new(),
            place: String::new(),
            kind: EventKind::Earthquake,
            status: EventStatus::Automatic,
            detail_url: String::new(),
        }
    }

    #[test]
    fn empty_set_yields_zeros() {
        let stats = WorkingSetStats::compute(&[], Utc::now());
        assert_eq!(stats, WorkingSetStats::default());
    }

    #[test]
    fn computes_totals_and_magnitudes() {
        let now = Utc::now();
        let events = [
            event(2.0, Duration::minutes(10)),
            event(6.0, Duration::minutes(20)),
            event(4.0, Duration::hours(3)),
        ];

        let stats = WorkingSetStats::compute(&events, now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.max_magnitude, 6.0);
        assert_eq!(stats.average_magnitude, 4.0);
        assert_eq!(stats.last_hour_count, 2);
    }

    #[test]
    fn negative_magnitudes_keep_their_real_maximum() {
        let now = Utc::now();
        let events = [
            event(-0.5, Duration::minutes(10)),
            event(-1.2, Duration::minutes(20)),
        ];

        let stats = WorkingSetStats::compute(&events, now);
        assert_eq!(stats.max_magnitude, -0.5);
    }
}
