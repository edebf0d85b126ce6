//! Filter parameters applied to the raw event sequence.
//!
//! The UI layer owns the live filter state; the engine treats every call
//! as an input snapshot and never retains a mutable reference across
//! renders. The region predicate replaces the original stringly `"all"`
//! sentinel with a closed enum.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::TimeWindow;

/// Region predicate for the filter pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum RegionFilter {
    /// Keep every event regardless of place (the `"all"` sentinel).
    #[default]
    All,
    /// Keep events whose place contains this substring,
    /// case-insensitively.
    Contains(String),
}

impl RegionFilter {
    /// Parse a filter-bar value: `"all"` (any casing) or empty means no
    /// region restriction, anything else is a substring match.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Contains(raw.to_owned())
        }
    }

    /// Whether the given place label passes this filter.
    pub fn matches(&self, place: &str) -> bool {
        match self {
            Self::All => true,
            Self::Contains(needle) => place.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

/// Snapshot of the user-controlled filters.
///
/// All three predicates are ANDed by the pipeline: magnitude floor, time
/// window, region substring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FilterParameters {
    /// Keep events with `magnitude >= min_magnitude`. Boundary events
    /// equal to the floor are kept.
    #[serde(default)]
    pub min_magnitude: f64,
    /// Lookback window relative to "now" at filter time.
    #[serde(default)]
    pub time_window: TimeWindow,
    /// Region substring predicate.
    #[serde(default)]
    pub region: RegionFilter,
}
