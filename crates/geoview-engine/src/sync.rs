//! Feed-to-map synchronization.
//!
//! [`MapSync`] owns the cluster layer manager and recomputes the working
//! set whenever the raw batch or the filters change: filter, project into
//! the map source, and publish a [`WorkingSnapshot`] for the list and
//! stats panels. The snapshot channel has watch semantics, so consumers
//! always observe the most recent working set; intermediate sets may be
//! coalesced but never delivered out of order.

use chrono::{DateTime, Utc};
use geoview_feed::FeedUpdate;
use geoview_map::dispatch::{ClusterActivateFn, PointActivateFn};
use geoview_map::{ClusterLayerManager, MapError, MapEvent, MapHandle};
use geoview_types::{Event, FilterParameters};
use tokio::sync::watch;
use tracing::debug;

use crate::config::EngineConfig;
use crate::filter::filter_events;
use crate::stats::WorkingSetStats;

/// One published working set, as consumed by the list and stats panels.
#[derive(Debug, Clone, Default)]
pub struct WorkingSnapshot {
    /// Filtered events, strongest first.
    pub events: Vec<Event>,
    /// Aggregate statistics over `events`.
    pub stats: WorkingSetStats,
    /// When the underlying batch was fetched, `None` before the first
    /// refresh.
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Orchestrates raw batches, filter state, the map source, and the
/// published snapshots.
#[derive(Debug)]
pub struct MapSync<M: MapHandle> {
    manager: ClusterLayerManager<M>,
    filters: FilterParameters,
    raw_events: Vec<Event>,
    refreshed_at: Option<DateTime<Utc>>,
    snapshot_tx: watch::Sender<WorkingSnapshot>,
}

impl<M: MapHandle> MapSync<M> {
    /// Wrap a map handle using the configured clustering parameters and
    /// initial filter state.
    pub fn new(map: M, config: &EngineConfig) -> Self {
        let (snapshot_tx, _) = watch::channel(WorkingSnapshot::default());
        Self {
            manager: ClusterLayerManager::new(map, config.cluster.cluster_config()),
            filters: config.filters.clone(),
            raw_events: Vec::new(),
            refreshed_at: None,
            snapshot_tx,
        }
    }

    /// Subscribe to published working sets. The receiver always holds the
    /// most recent snapshot.
    pub fn snapshots(&self) -> watch::Receiver<WorkingSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// The current filter state.
    pub const fn filters(&self) -> &FilterParameters {
        &self.filters
    }

    /// Read access to the owned map handle.
    pub const fn map(&self) -> &M {
        self.manager.map()
    }

    /// Mutable access to the owned map handle.
    pub const fn map_mut(&mut self) -> &mut M {
        self.manager.map_mut()
    }

    /// Attach the cluster activation callback.
    pub fn set_on_cluster_activate(&mut self, callback: ClusterActivateFn) {
        self.manager.set_on_cluster_activate(callback);
    }

    /// Attach the point activation callback.
    pub fn set_on_point_activate(&mut self, callback: PointActivateFn) {
        self.manager.set_on_point_activate(callback);
    }

    /// Install the map-side resources now if the style is already loaded.
    pub fn ensure_installed(&mut self) -> Result<(), MapError> {
        self.manager.ensure_installed()
    }

    /// Replace the raw batch with a fresh feed update and recompute.
    pub fn apply_update(&mut self, update: &FeedUpdate, now: DateTime<Utc>) -> Result<(), MapError> {
        debug!(events = update.events.len(), "applying feed update");
        self.raw_events.clone_from(&update.events);
        self.refreshed_at = Some(update.fetched_at);
        self.recompute(now)
    }

    /// Replace the filter state and recompute over the retained raw
    /// batch. Relaxing a filter therefore restores previously hidden
    /// events without another fetch.
    pub fn apply_filters(
        &mut self,
        filters: FilterParameters,
        now: DateTime<Utc>,
    ) -> Result<(), MapError> {
        debug!(?filters, "applying filter change");
        self.filters = filters;
        self.recompute(now)
    }

    /// Forward a signal from the live map instance to the layer manager.
    pub fn handle_map_event(&mut self, event: MapEvent) -> Result<(), MapError> {
        self.manager.handle_event(event)
    }

    /// Detach from the map and stop publishing.
    pub fn teardown(&mut self) {
        self.manager.teardown();
    }

    /// Consume the synchronizer and return the map handle after teardown.
    pub fn into_map(self) -> M {
        self.manager.into_map()
    }

    fn recompute(&mut self, now: DateTime<Utc>) -> Result<(), MapError> {
        let events = filter_events(&self.raw_events, &self.filters, now);
        let stats = WorkingSetStats::compute(&events, now);
        self.manager.set_working_set(&events)?;
        self.snapshot_tx.send_replace(WorkingSnapshot {
            events,
            stats,
            refreshed_at: self.refreshed_at,
        });
        Ok(())
    }
}
