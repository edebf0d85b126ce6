//! Shared type definitions for the GeoView map-sync engine.
//!
//! This crate is the single source of truth for the value types that flow
//! between the feed, the filter pipeline, and the cluster layer manager.
//! Types defined here flow downstream to `TypeScript` via `ts-rs` for the
//! dashboard frontend.
//!
//! # Modules
//!
//! - [`ids`] -- The typed wrapper around the feed's opaque event identifier
//! - [`enums`] -- Enumeration types (event kind/status, time windows)
//! - [`event`] -- The canonical [`Event`] record and its [`Position`]
//! - [`filters`] -- [`FilterParameters`] and the [`RegionFilter`] predicate
//! - [`geojson`] -- The narrow GeoJSON projection handed to the map source

pub mod enums;
pub mod event;
pub mod filters;
pub mod geojson;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use enums::{EventKind, EventStatus, TimeWindow};
pub use event::{Event, Position};
pub use filters::{FilterParameters, RegionFilter};
pub use geojson::{
    CollectionType, EventProperties, FeatureCollection, FeatureType, GeometryType, PointFeature,
    PointGeometry,
};
pub use ids::EventId;
