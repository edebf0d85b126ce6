//! The abstract rendering surface driven by the cluster layer manager.
//!
//! [`MapHandle`] models the slice of a MapLibre-style map API the engine
//! needs: source/layer mutation, layer-scoped pointer listeners, camera
//! easing, cursor styling, popups, and the capability-checked cluster
//! expansion queries. Cluster leaf expansion may be unavailable depending
//! on the backend version; those methods return `None` rather than
//! erroring, and the dispatcher degrades to a plain zoom.
//!
//! The map is an external, stateful resource whose lifecycle (style load,
//! layer existence) is only loosely coupled to the data lifecycle. The
//! manager is its sole mutator.

use geoview_types::FeatureCollection;

use crate::error::MapError;

/// A geographic coordinate in longitude/latitude order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLat {
    /// Degrees east.
    pub lng: f64,
    /// Degrees north.
    pub lat: f64,
}

/// A screen-space pointer position in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Pixels from the left edge of the canvas.
    pub x: f64,
    /// Pixels from the top edge of the canvas.
    pub y: f64,
}

/// The pointer gesture kinds the dispatcher subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PointerKind {
    /// A click (or tap) on the layer.
    Click,
    /// The pointer entered a rendered feature of the layer.
    MouseEnter,
    /// The pointer left the layer's rendered features.
    MouseLeave,
}

/// Opaque handle for a registered layer-scoped listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Pointer cursor styles toggled by hover gestures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cursor {
    /// The backend's default cursor.
    #[default]
    Default,
    /// The pointing-hand cursor shown over interactive features.
    Pointer,
}

/// Specification for the clustering point-data source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpec {
    /// Source id, unique within the map's namespace.
    pub id: String,
    /// Initial feature data.
    pub data: FeatureCollection,
    /// Whether the backend should cluster nearby points.
    pub cluster: bool,
    /// Cluster aggregation radius in pixels.
    pub cluster_radius: u32,
    /// Highest zoom level at which points are still clustered.
    pub cluster_max_zoom: u32,
}

/// The rendering primitive a layer draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Filled circles (clusters and individual points).
    Circle,
    /// Text symbols (cluster counts).
    Symbol,
}

/// Specification for one rendering layer.
///
/// `filter`, `layout`, and `paint` are MapLibre style expressions carried
/// as JSON, the format the backend consumes directly.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    /// Layer id, unique within the map's namespace.
    pub id: String,
    /// Id of the source this layer renders from.
    pub source: String,
    /// Rendering primitive.
    pub kind: LayerKind,
    /// Feature filter expression.
    pub filter: serde_json::Value,
    /// Layout properties.
    pub layout: serde_json::Value,
    /// Paint properties.
    pub paint: serde_json::Value,
}

/// One feature returned by a rendered-features query.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeature {
    /// The feature's representative coordinate (cluster centroid or point
    /// position).
    pub coordinate: LngLat,
    /// The feature's property bag as the backend reports it.
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl RenderedFeature {
    /// The backend-assigned cluster id, present only on cluster features.
    pub fn cluster_id(&self) -> Option<u64> {
        self.properties.get("cluster_id").and_then(serde_json::Value::as_u64)
    }

    /// Number of points aggregated into this cluster, present only on
    /// cluster features.
    pub fn point_count(&self) -> Option<u64> {
        self.properties.get("point_count").and_then(serde_json::Value::as_u64)
    }
}

/// The slice of the map API the cluster layer manager drives.
///
/// All mutations are synchronous and complete before the next queued
/// event is processed; the asynchronous part of the map lifecycle (style
/// loading) is delivered to the manager as
/// [`MapEvent`](crate::manager::MapEvent) signals by the host.
pub trait MapHandle {
    /// Whether the style has finished loading and layers may be mutated.
    fn is_style_loaded(&self) -> bool;

    /// Whether a source with this id exists.
    fn has_source(&self, id: &str) -> bool;

    /// Whether a layer with this id exists.
    fn has_layer(&self, id: &str) -> bool;

    /// Add a point-data source.
    fn add_source(&mut self, spec: SourceSpec) -> Result<(), MapError>;

    /// Add a rendering layer referencing an existing source.
    fn add_layer(&mut self, spec: LayerSpec) -> Result<(), MapError>;

    /// Remove a layer by id.
    fn remove_layer(&mut self, id: &str) -> Result<(), MapError>;

    /// Remove a source by id. Fails while layers still reference it.
    fn remove_source(&mut self, id: &str) -> Result<(), MapError>;

    /// Replace a source's feature data in place.
    fn set_source_data(&mut self, id: &str, data: &FeatureCollection) -> Result<(), MapError>;

    /// Register a layer-scoped pointer listener and return its handle.
    fn add_listener(&mut self, kind: PointerKind, layer_id: &str) -> ListenerId;

    /// Unregister a pointer listener. Unknown ids are ignored.
    fn remove_listener(&mut self, id: ListenerId);

    /// Query the rendered features of one layer at a screen position.
    fn query_rendered_features(&self, point: ScreenPoint, layer_id: &str) -> Vec<RenderedFeature>;

    /// Current camera zoom level.
    fn zoom(&self) -> f64;

    /// Ease the camera toward a center and zoom.
    fn ease_to(&mut self, center: LngLat, zoom: f64);

    /// Set the pointer cursor style.
    fn set_cursor(&mut self, cursor: Cursor);

    /// Show a location-anchored detail popup.
    fn show_popup(&mut self, anchor: LngLat, title: &str, body: &str);

    /// The zoom level at which the given cluster splits apart, or `None`
    /// when the backend does not support expansion queries.
    fn cluster_expansion_zoom(&self, source_id: &str, cluster_id: u64) -> Option<f64>;

    /// The individual features aggregated into the given cluster, or
    /// `None` when the backend does not support leaf expansion.
    fn cluster_leaves(
        &self,
        source_id: &str,
        cluster_id: u64,
        limit: usize,
    ) -> Option<Vec<RenderedFeature>>;
}
