//! The canonical event record produced by the normalizer.
//!
//! An [`Event`] is an immutable value: the normalizer builds it from one
//! raw feed record, and every refresh supersedes the whole sequence. The
//! feed has no stable revision field beyond `id` and the occurrence time,
//! so nothing here is ever patched in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EventKind, EventStatus};
use crate::ids::EventId;

/// A geographic position as reported by the feed.
///
/// Coordinates are taken verbatim from the feed, no reprojection. The
/// normalizer guarantees longitude and latitude are numeric; the feature
/// projection double-checks finiteness before anything reaches the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Degrees east, in [-180, 180].
    pub longitude: f64,
    /// Degrees north, in [-90, 90].
    pub latitude: f64,
    /// Hypocenter depth in kilometers, >= 0 (0 when the feed omits it).
    pub depth_km: f64,
}

impl Position {
    /// Whether both horizontal coordinates are finite numbers.
    ///
    /// Non-finite coordinates must never reach the map source; a feature
    /// with a NaN coordinate silently breaks clustering.
    pub fn is_plottable(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }

    /// The `[longitude, latitude]` pair in GeoJSON order.
    pub const fn lng_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// One normalized point event from the feed.
///
/// Created by the normalizer from one raw record; never mutated. A refresh
/// replaces the entire event sequence rather than diffing individual
/// events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Feed-unique identifier.
    pub id: EventId,
    /// Where the event occurred.
    pub position: Position,
    /// Magnitude, roughly in [-1, 10] (0 when the feed omits it).
    pub magnitude: f64,
    /// When the event occurred.
    pub time_occurred: DateTime<Utc>,
    /// Human-readable headline, e.g. "M 4.5 - 10 km SW of X".
    pub title: String,
    /// Free-text location label, e.g. "Southern California".
    pub place: String,
    /// Seismic event category.
    pub kind: EventKind,
    /// Review status.
    pub status: EventStatus,
    /// URL of the upstream detail page for this event.
    pub detail_url: String,
}
