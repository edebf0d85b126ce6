//! The cluster layer manager: an explicit state machine around the map's
//! layer lifecycle.
//!
//! States: `Uninstalled -> Installing -> Installed -> Reinstalling ->
//! Installed -> TornDown`. The manager never mutates layers before the
//! style-loaded signal, removes resources before re-adding them so a
//! double install cannot duplicate anything, updates source data in place
//! on working-set changes, reinstalls wholesale on style changes (a style
//! swap discards all layers at the rendering-engine level), and tears
//! down listeners best-effort because the order of map disposal and
//! component disposal is not guaranteed.

use geoview_types::{Event, FeatureCollection};
use tracing::{debug, info};

use crate::dispatch::{ClusterActivateFn, InteractionDispatcher, PointActivateFn};
use crate::error::MapError;
use crate::features::project_working_set;
use crate::handle::{ListenerId, MapHandle, PointerKind, ScreenPoint};
use crate::layers::{
    LAYER_IDS, SOURCE_ID, cluster_circle_layer, cluster_count_layer, source_spec,
    unclustered_layer,
};

/// Clustering parameters for the point-data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Cluster aggregation radius in pixels.
    pub cluster_radius: u32,
    /// Highest zoom level at which points are still clustered.
    pub cluster_max_zoom: u32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            cluster_radius: 50,
            cluster_max_zoom: 14,
        }
    }
}

/// Lifecycle state of the map-side resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    /// No resources exist; waiting for the style-loaded signal.
    Uninstalled,
    /// The install sequence is running.
    Installing,
    /// Source, layers, and listeners all exist.
    Installed,
    /// A style change invalidated the resources; reinstall is running.
    Reinstalling,
    /// The manager was detached; only the map's own teardown remains.
    TornDown,
}

/// Signals the host forwards from the live map instance.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The style finished loading; layer mutation is now legal.
    StyleLoaded,
    /// The basemap style was swapped, discarding all layers and sources.
    StyleChanged,
    /// A pointer event scoped to one of the managed layers.
    Pointer {
        /// The gesture kind.
        kind: PointerKind,
        /// The layer the event was delivered for.
        layer_id: String,
        /// Screen-space pointer position.
        point: ScreenPoint,
    },
}

/// Owns the map's point-data source, the cluster/point layers, and the
/// six pointer listeners.
///
/// Invariant: either all resources exist together or none do. The
/// install sequence enforces this by removing any survivors before
/// adding, in dependency order (layers before the source they
/// reference).
#[derive(Debug)]
pub struct ClusterLayerManager<M: MapHandle> {
    map: M,
    config: ClusterConfig,
    state: InstallState,
    data: FeatureCollection,
    listeners: Vec<ListenerId>,
    dispatcher: InteractionDispatcher,
}

impl<M: MapHandle> ClusterLayerManager<M> {
    /// Take ownership of a map handle. No resources are created yet;
    /// call [`Self::ensure_installed`] (or forward
    /// [`MapEvent::StyleLoaded`]) to install.
    pub fn new(map: M, config: ClusterConfig) -> Self {
        Self {
            map,
            config,
            state: InstallState::Uninstalled,
            data: FeatureCollection::default(),
            listeners: Vec::new(),
            dispatcher: InteractionDispatcher::new(),
        }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> InstallState {
        self.state
    }

    /// Read access to the owned map handle.
    pub const fn map(&self) -> &M {
        &self.map
    }

    /// Mutable access to the owned map handle, for the host that drives
    /// camera or style operations outside this manager's scope.
    pub const fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    /// Attach the cluster activation callback.
    pub fn set_on_cluster_activate(&mut self, callback: ClusterActivateFn) {
        self.dispatcher.set_on_cluster_activate(callback);
    }

    /// Attach the point activation callback.
    pub fn set_on_point_activate(&mut self, callback: PointActivateFn) {
        self.dispatcher.set_on_point_activate(callback);
    }

    /// Install now if the style is already loaded, otherwise stay
    /// uninstalled until the host forwards [`MapEvent::StyleLoaded`].
    pub fn ensure_installed(&mut self) -> Result<(), MapError> {
        match self.state {
            InstallState::Installed | InstallState::TornDown => Ok(()),
            _ if self.map.is_style_loaded() => self.install(),
            _ => {
                debug!("style not loaded yet, install deferred to the style-loaded signal");
                Ok(())
            }
        }
    }

    /// Replace the working set backing the source.
    ///
    /// While installed this updates only the source's feature data in
    /// place; no layers or listeners are touched, so it is cheap to call
    /// on every refresh or filter change. Rapid successive calls are
    /// last-write-wins: the source always reflects the most recent set.
    pub fn set_working_set(&mut self, events: &[Event]) -> Result<(), MapError> {
        self.data = project_working_set(events);
        if self.state == InstallState::Installed {
            self.map.set_source_data(SOURCE_ID, &self.data)?;
        }
        Ok(())
    }

    /// React to a signal forwarded from the live map instance.
    pub fn handle_event(&mut self, event: MapEvent) -> Result<(), MapError> {
        if self.state == InstallState::TornDown {
            debug!("ignoring map event after teardown");
            return Ok(());
        }
        match event {
            MapEvent::StyleLoaded => match self.state {
                InstallState::Uninstalled => self.install(),
                _ => {
                    debug!(state = ?self.state, "style-loaded signal with resources present");
                    Ok(())
                }
            },
            MapEvent::StyleChanged => {
                // A style swap already discarded the layers; reinstall
                // from scratch. The remove-before-add guard inside
                // install() also covers backends that keep resources
                // across swaps.
                self.state = InstallState::Reinstalling;
                self.install()
            }
            MapEvent::Pointer {
                kind,
                layer_id,
                point,
            } => {
                self.dispatcher
                    .pointer_event(&mut self.map, kind, &layer_id, point);
                Ok(())
            }
        }
    }

    /// Detach from the map: unsubscribe all listeners and stop reacting
    /// to events. Source and layer removal is left to the map's own
    /// teardown; nothing here fails on a missing resource.
    pub fn teardown(&mut self) {
        InteractionDispatcher::unsubscribe(&mut self.map, &self.listeners);
        self.listeners.clear();
        self.state = InstallState::TornDown;
        info!("cluster layer manager torn down");
    }

    /// Consume the manager and return the map handle after teardown.
    pub fn into_map(mut self) -> M {
        if self.state != InstallState::TornDown {
            self.teardown();
        }
        self.map
    }

    /// Run the install sequence: remove any surviving resources in
    /// dependency order, then add the source, the three layers, and the
    /// six listeners. Calling this twice in a row yields exactly one
    /// source, three layers, and six listeners.
    fn install(&mut self) -> Result<(), MapError> {
        if !self.map.is_style_loaded() {
            return Err(MapError::StyleNotLoaded);
        }

        if self.state != InstallState::Reinstalling {
            self.state = InstallState::Installing;
        }

        // Stale listeners first, so no handler can fire against
        // resources that are about to disappear.
        InteractionDispatcher::unsubscribe(&mut self.map, &self.listeners);
        self.listeners.clear();

        // Layers before the source they reference.
        for layer_id in LAYER_IDS {
            if self.map.has_layer(layer_id) {
                self.map.remove_layer(layer_id)?;
            }
        }
        if self.map.has_source(SOURCE_ID) {
            self.map.remove_source(SOURCE_ID)?;
        }

        self.map.add_source(source_spec(
            self.data.clone(),
            self.config.cluster_radius,
            self.config.cluster_max_zoom,
        ))?;
        self.map.add_layer(cluster_circle_layer())?;
        self.map.add_layer(cluster_count_layer())?;
        self.map.add_layer(unclustered_layer())?;

        self.listeners = InteractionDispatcher::subscribe(&mut self.map);
        self.state = InstallState::Installed;
        info!(
            features = self.data.len(),
            cluster_radius = self.config.cluster_radius,
            cluster_max_zoom = self.config.cluster_max_zoom,
            "cluster layers installed"
        );
        Ok(())
    }
}
