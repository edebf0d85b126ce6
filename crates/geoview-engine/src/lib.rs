//! GeoView orchestration: the filter pipeline, working-set statistics,
//! feed-to-map synchronization, and the refresh driver.
//!
//! The data flow is one direction: raw batches from `geoview-feed` and
//! filter snapshots from the UI enter [`MapSync`], which recomputes the
//! working set (filter, sort, aggregate), pushes it into the map through
//! `geoview-map`, and publishes a [`WorkingSnapshot`] for the list and
//! stats panels. [`driver::run`] is the select loop that serializes those
//! inputs at runtime.

pub mod config;
pub mod driver;
pub mod filter;
pub mod stats;
pub mod sync;
pub mod telemetry;

pub use config::{ConfigError, EngineConfig};
pub use filter::filter_events;
pub use stats::WorkingSetStats;
pub use sync::{MapSync, WorkingSnapshot};
