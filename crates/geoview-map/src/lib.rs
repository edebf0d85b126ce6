//! Event clustering and map-state synchronization for GeoView.
//!
//! This crate owns the map's point-data source and cluster/point layers.
//! It is the only component that mutates the map instance; everything
//! else consumes the working set or the activation callbacks.
//!
//! # Modules
//!
//! - [`handle`] -- the [`MapHandle`] trait abstracting the rendering
//!   surface (sources, layers, listeners, camera, cursor, popups)
//! - [`layers`] -- the source/layer catalog with its paint expressions
//! - [`features`] -- working set to GeoJSON feature-collection projection
//! - [`manager`] -- the [`ClusterLayerManager`] install/teardown state
//!   machine
//! - [`dispatch`] -- pointer-gesture classification and activation
//!   callbacks
//! - [`testing`] -- a scripted in-memory map for tests
//!
//! The manager never touches the map before the style-loaded signal, is
//! idempotent across repeated installs (remove-before-add), updates
//! source data in place on working-set changes, reinstalls wholesale on
//! style changes, and tears down listeners best-effort on detach.

pub mod dispatch;
pub mod error;
pub mod features;
pub mod handle;
pub mod layers;
pub mod manager;
pub mod testing;

pub use dispatch::{ClusterActivateFn, InteractionDispatcher, PointActivateFn};
pub use error::MapError;
pub use handle::{
    Cursor, LayerKind, LayerSpec, LngLat, ListenerId, MapHandle, PointerKind, RenderedFeature,
    ScreenPoint, SourceSpec,
};
pub use manager::{ClusterConfig, ClusterLayerManager, InstallState, MapEvent};
