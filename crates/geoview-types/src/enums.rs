//! Enumeration types for the GeoView map-sync engine.
//!
//! Event kind and review status come from the upstream feed as free-form
//! strings; both enums keep an `Other` catch-all so an unrecognized feed
//! value degrades gracefully instead of failing the refresh. The time
//! window is the closed set of lookback ranges offered by the filter bar.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Event kind
// ---------------------------------------------------------------------------

/// The seismic event category reported by the feed's `type` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A natural tectonic earthquake.
    Earthquake,
    /// A human-made quarry blast.
    QuarryBlast,
    /// A non-quarry explosion.
    Explosion,
    /// Glacier-related seismicity.
    IceQuake,
    /// Any kind the feed reports that we do not model explicitly.
    #[serde(other)]
    Other,
}

impl EventKind {
    /// Map a raw feed `type` string onto a kind, falling back to
    /// [`Self::Other`] for values we do not recognize.
    pub fn from_feed(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "earthquake" => Self::Earthquake,
            "quarry blast" | "quarry_blast" => Self::QuarryBlast,
            "explosion" => Self::Explosion,
            "ice quake" | "ice_quake" => Self::IceQuake,
            _ => Self::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Review status
// ---------------------------------------------------------------------------

/// The review status reported by the feed's `status` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Located automatically, not yet human-reviewed.
    Automatic,
    /// Reviewed and confirmed by an analyst.
    Reviewed,
    /// Retracted by the network operator.
    Deleted,
    /// Any status the feed reports that we do not model explicitly.
    #[serde(other)]
    Other,
}

impl EventStatus {
    /// Map a raw feed `status` string onto a status, falling back to
    /// [`Self::Other`] for values we do not recognize.
    pub fn from_feed(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "automatic" => Self::Automatic,
            "reviewed" => Self::Reviewed,
            "deleted" => Self::Deleted,
            _ => Self::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Time window
// ---------------------------------------------------------------------------

/// Lookback window applied by the time predicate of the filter pipeline.
///
/// Unrecognized labels fall back to the 24-hour window. This is a
/// documented fallback matching the filter bar's default, not a failure.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum TimeWindow {
    /// Events from the last hour.
    #[serde(rename = "1h")]
    OneHour,
    /// Events from the last six hours.
    #[serde(rename = "6h")]
    SixHours,
    /// Events from the last twelve hours.
    #[serde(rename = "12h")]
    TwelveHours,
    /// Events from the last twenty-four hours (the default window).
    #[default]
    #[serde(rename = "24h")]
    #[serde(other)]
    TwentyFourHours,
}

impl TimeWindow {
    /// Parse a filter-bar label, falling back to the 24-hour window for
    /// anything unrecognized.
    pub fn from_label(label: &str) -> Self {
        match label {
            "1h" => Self::OneHour,
            "6h" => Self::SixHours,
            "12h" => Self::TwelveHours,
            _ => Self::TwentyFourHours,
        }
    }

    /// The duration this window spans.
    pub fn duration(self) -> Duration {
        match self {
            Self::OneHour => Duration::hours(1),
            Self::SixHours => Duration::hours(6),
            Self::TwelveHours => Duration::hours(12),
            Self::TwentyFourHours => Duration::hours(24),
        }
    }

    /// The filter-bar label for this window.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::SixHours => "6h",
            Self::TwelveHours => "12h",
            Self::TwentyFourHours => "24h",
        }
    }
}
