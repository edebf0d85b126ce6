//! Scripted in-memory map for tests.
//!
//! [`FakeMap`] implements [`MapHandle`] over plain collections and
//! records every mutation, so lifecycle tests can assert resource counts
//! (idempotence), listener counts (handler leaks), camera targets, and
//! popup contents without a rendering engine. Query results and cluster
//! expansion answers are scripted per test.
//!
//! It also validates the contract a real backend enforces: duplicate
//! sources/layers are rejected, layers cannot outlive their source, and
//! nothing can be mutated before the style loads.

use std::collections::BTreeMap;

use geoview_types::FeatureCollection;

use crate::error::MapError;
use crate::handle::{
    Cursor, LayerSpec, LngLat, ListenerId, MapHandle, PointerKind, RenderedFeature, ScreenPoint,
    SourceSpec,
};
use crate::manager::{ClusterLayerManager, MapEvent};

/// An in-memory [`MapHandle`] that records all mutations.
#[derive(Debug)]
pub struct FakeMap {
    style_loaded: bool,
    sources: BTreeMap<String, SourceSpec>,
    layers: Vec<LayerSpec>,
    listeners: Vec<(ListenerId, PointerKind, String)>,
    next_listener: u64,
    zoom: f64,
    eases: Vec<(LngLat, f64)>,
    cursor: Cursor,
    popups: Vec<(LngLat, String, String)>,
    query_results: BTreeMap<String, Vec<RenderedFeature>>,
    leaf_expansion_supported: bool,
    cluster_leaves: BTreeMap<u64, Vec<RenderedFeature>>,
    expansion_zooms: BTreeMap<u64, f64>,
    set_data_calls: u64,
}

impl Default for FakeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeMap {
    /// Create a map whose style has not loaded yet.
    pub fn new() -> Self {
        Self {
            style_loaded: false,
            sources: BTreeMap::new(),
            layers: Vec::new(),
            listeners: Vec::new(),
            next_listener: 0,
            zoom: 2.0,
            eases: Vec::new(),
            cursor: Cursor::Default,
            popups: Vec::new(),
            query_results: BTreeMap::new(),
            leaf_expansion_supported: true,
            cluster_leaves: BTreeMap::new(),
            expansion_zooms: BTreeMap::new(),
            set_data_calls: 0,
        }
    }

    /// Create a map whose style is already loaded.
    pub fn with_loaded_style() -> Self {
        let mut map = Self::new();
        map.style_loaded = true;
        map
    }

    /// Mark the style as loaded (the host would now forward
    /// [`MapEvent::StyleLoaded`]).
    pub fn finish_style_load(&mut self) {
        self.style_loaded = true;
    }

    /// Simulate a basemap style swap: the rendering engine discards all
    /// layers and sources; listener registrations survive on the map
    /// object itself.
    pub fn simulate_style_change(&mut self) {
        self.layers.clear();
        self.sources.clear();
    }

    /// Script the current camera zoom.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Script whether cluster leaf expansion is supported.
    pub fn set_leaf_expansion_supported(&mut self, supported: bool) {
        self.leaf_expansion_supported = supported;
    }

    /// Script the features returned by rendered-feature queries against
    /// one layer (any screen point).
    pub fn script_query_result(&mut self, layer_id: &str, features: Vec<RenderedFeature>) {
        self.query_results.insert(layer_id.to_owned(), features);
    }

    /// Script the leaves returned for a cluster id.
    pub fn script_cluster_leaves(&mut self, cluster_id: u64, leaves: Vec<RenderedFeature>) {
        self.cluster_leaves.insert(cluster_id, leaves);
    }

    /// Script the expansion zoom reported for a cluster id.
    pub fn script_expansion_zoom(&mut self, cluster_id: u64, zoom: f64) {
        self.expansion_zooms.insert(cluster_id, zoom);
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of registered layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total number of registered pointer listeners.
    pub fn listener_total(&self) -> usize {
        self.listeners.len()
    }

    /// Number of listeners registered for one gesture on one layer.
    pub fn listener_count(&self, kind: PointerKind, layer_id: &str) -> usize {
        self.listeners
            .iter()
            .filter(|(_, k, layer)| *k == kind && layer == layer_id)
            .count()
    }

    /// The feature data currently held by a source.
    pub fn source_data(&self, id: &str) -> Option<&FeatureCollection> {
        self.sources.get(id).map(|spec| &spec.data)
    }

    /// How many in-place data updates the map has received.
    pub const fn set_data_calls(&self) -> u64 {
        self.set_data_calls
    }

    /// Camera ease targets in call order.
    pub fn eases(&self) -> &[(LngLat, f64)] {
        &self.eases
    }

    /// The current cursor style.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Popups shown so far, as (anchor, title, body).
    pub fn popups(&self) -> &[(LngLat, String, String)] {
        &self.popups
    }
}

impl MapHandle for FakeMap {
    fn is_style_loaded(&self) -> bool {
        self.style_loaded
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|layer| layer.id == id)
    }

    fn add_source(&mut self, spec: SourceSpec) -> Result<(), MapError> {
        if !self.style_loaded {
            return Err(MapError::StyleNotLoaded);
        }
        if self.sources.contains_key(&spec.id) {
            return Err(MapError::DuplicateSource(spec.id));
        }
        self.sources.insert(spec.id.clone(), spec);
        Ok(())
    }

    fn add_layer(&mut self, spec: LayerSpec) -> Result<(), MapError> {
        if !self.style_loaded {
            return Err(MapError::StyleNotLoaded);
        }
        if self.has_layer(&spec.id) {
            return Err(MapError::DuplicateLayer(spec.id));
        }
        if !self.sources.contains_key(&spec.source) {
            return Err(MapError::SourceNotFound(spec.source));
        }
        self.layers.push(spec);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), MapError> {
        let before = self.layers.len();
        self.layers.retain(|layer| layer.id != id);
        if self.layers.len() == before {
            return Err(MapError::LayerNotFound(id.to_owned()));
        }
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<(), MapError> {
        if let Some(layer) = self.layers.iter().find(|layer| layer.source == id) {
            return Err(MapError::SourceInUse {
                source_id: id.to_owned(),
                layer: layer.id.clone(),
            });
        }
        self.sources
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| MapError::SourceNotFound(id.to_owned()))
    }

    fn set_source_data(&mut self, id: &str, data: &FeatureCollection) -> Result<(), MapError> {
        let Some(spec) = self.sources.get_mut(id) else {
            return Err(MapError::SourceNotFound(id.to_owned()));
        };
        spec.data = data.clone();
        self.set_data_calls = self.set_data_calls.saturating_add(1);
        Ok(())
    }

    fn add_listener(&mut self, kind: PointerKind, layer_id: &str) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener = self.next_listener.saturating_add(1);
        self.listeners.push((id, kind, layer_id.to_owned()));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener, _, _)| *listener != id);
    }

    fn query_rendered_features(&self, _point: ScreenPoint, layer_id: &str) -> Vec<RenderedFeature> {
        self.query_results.get(layer_id).cloned().unwrap_or_default()
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn ease_to(&mut self, center: LngLat, zoom: f64) {
        self.eases.push((center, zoom));
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn show_popup(&mut self, anchor: LngLat, title: &str, body: &str) {
        self.popups.push((anchor, title.to_owned(), body.to_owned()));
    }

    fn cluster_expansion_zoom(&self, _source_id: &str, cluster_id: u64) -> Option<f64> {
        if !self.leaf_expansion_supported {
            return None;
        }
        self.expansion_zooms.get(&cluster_id).copied()
    }

    fn cluster_leaves(
        &self,
        _source_id: &str,
        cluster_id: u64,
        limit: usize,
    ) -> Option<Vec<RenderedFeature>> {
        if !self.leaf_expansion_supported {
            return None;
        }
        let leaves = self.cluster_leaves.get(&cluster_id).cloned().unwrap_or_default();
        Some(leaves.into_iter().take(limit).collect())
    }
}

/// Deliver one user gesture the way a real map would: the event fires
/// once per listener registered for that gesture and layer. Duplicate
/// registrations therefore multiply callbacks, which is exactly what the
/// handler-leak tests detect.
pub fn deliver_pointer(
    manager: &mut ClusterLayerManager<FakeMap>,
    kind: PointerKind,
    layer_id: &str,
    point: ScreenPoint,
) {
    let registrations = manager.map().listener_count(kind, layer_id);
    for _ in 0..registrations {
        let _ = manager.handle_event(MapEvent::Pointer {
            kind,
            layer_id: layer_id.to_owned(),
            point,
        });
    }
}

/// Build a rendered cluster feature with the backend-style
/// `cluster_id`/`point_count` properties.
pub fn rendered_cluster(cluster_id: u64, point_count: u64, coordinate: LngLat) -> RenderedFeature {
    let mut properties = serde_json::Map::new();
    properties.insert("cluster_id".to_owned(), serde_json::json!(cluster_id));
    properties.insert("point_count".to_owned(), serde_json::json!(point_count));
    RenderedFeature {
        coordinate,
        properties,
    }
}

/// Build a rendered point feature from a serialized
/// [`geoview_types::EventProperties`] value.
pub fn rendered_point(properties: &geoview_types::EventProperties, coordinate: LngLat) -> RenderedFeature {
    let value = serde_json::to_value(properties).unwrap_or_default();
    let properties = match value {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    RenderedFeature {
        coordinate,
        properties,
    }
}
