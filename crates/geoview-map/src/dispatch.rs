//! Pointer-gesture classification and activation callbacks.
//!
//! Two logical gestures exist, each scoped to its layer id so the global
//! gesture stream is filtered to layer-relevant hits only: cluster
//! activation (click on the cluster layer) and point activation (click on
//! the individual point layer). Hover enter/leave on either layer toggles
//! the pointer cursor and has no other side effect.
//!
//! Each (re)install cycle removes its listeners before registering fresh
//! ones; without that, a live map instance accumulates duplicate handlers
//! across re-renders. That is a correctness invariant, not an
//! optimization, and the handler-leak test in `tests/lifecycle_tests.rs`
//! pins it.

use geoview_types::EventProperties;
use tracing::{debug, warn};

use crate::handle::{Cursor, ListenerId, MapHandle, PointerKind, RenderedFeature, ScreenPoint};
use crate::layers::{CLUSTER_LAYER_ID, SOURCE_ID, UNCLUSTERED_LAYER_ID};

/// Maximum number of leaves requested when expanding a cluster.
pub const CLUSTER_LEAF_LIMIT: usize = 100;

/// Zoom increment applied when easing toward a cluster without expansion
/// support.
pub const CLUSTER_ZOOM_STEP: f64 = 2.0;

/// Ceiling for any cluster-driven zoom.
pub const MAX_CLUSTER_ZOOM: f64 = 16.0;

/// Callback invoked with the expanded features of an activated cluster
/// (or the cluster feature itself on the degraded path).
pub type ClusterActivateFn = Box<dyn FnMut(&[RenderedFeature]) + Send>;

/// Callback invoked with the properties of an activated individual point.
pub type PointActivateFn = Box<dyn FnMut(&EventProperties) + Send>;

/// Classifies layer-scoped pointer events and emits normalized
/// activation callbacks, exactly one per user gesture.
#[derive(Default)]
pub struct InteractionDispatcher {
    on_cluster_activate: Option<ClusterActivateFn>,
    on_point_activate: Option<PointActivateFn>,
}

impl core::fmt::Debug for InteractionDispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InteractionDispatcher")
            .field("on_cluster_activate", &self.on_cluster_activate.is_some())
            .field("on_point_activate", &self.on_point_activate.is_some())
            .finish()
    }
}

impl InteractionDispatcher {
    /// Create a dispatcher with no callbacks attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the cluster activation callback.
    pub fn set_on_cluster_activate(&mut self, callback: ClusterActivateFn) {
        self.on_cluster_activate = Some(callback);
    }

    /// Attach the point activation callback.
    pub fn set_on_point_activate(&mut self, callback: PointActivateFn) {
        self.on_point_activate = Some(callback);
    }

    /// Register the six layer-scoped listeners (cluster click, point
    /// click, and the four hover transitions) and return their handles.
    pub fn subscribe<M: MapHandle>(map: &mut M) -> Vec<ListenerId> {
        vec![
            map.add_listener(PointerKind::Click, CLUSTER_LAYER_ID),
            map.add_listener(PointerKind::Click, UNCLUSTERED_LAYER_ID),
            map.add_listener(PointerKind::MouseEnter, CLUSTER_LAYER_ID),
            map.add_listener(PointerKind::MouseLeave, CLUSTER_LAYER_ID),
            map.add_listener(PointerKind::MouseEnter, UNCLUSTERED_LAYER_ID),
            map.add_listener(PointerKind::MouseLeave, UNCLUSTERED_LAYER_ID),
        ]
    }

    /// Remove previously registered listeners, best-effort.
    pub fn unsubscribe<M: MapHandle>(map: &mut M, listeners: &[ListenerId]) {
        for &id in listeners {
            map.remove_listener(id);
        }
    }

    /// Route one pointer event delivered for a subscribed layer.
    pub fn pointer_event<M: MapHandle>(
        &mut self,
        map: &mut M,
        kind: PointerKind,
        layer_id: &str,
        point: ScreenPoint,
    ) {
        match (kind, layer_id) {
            (PointerKind::Click, CLUSTER_LAYER_ID) => self.cluster_click(map, point),
            (PointerKind::Click, UNCLUSTERED_LAYER_ID) => self.point_click(map, point),
            (PointerKind::MouseEnter, CLUSTER_LAYER_ID | UNCLUSTERED_LAYER_ID) => {
                map.set_cursor(Cursor::Pointer);
            }
            (PointerKind::MouseLeave, CLUSTER_LAYER_ID | UNCLUSTERED_LAYER_ID) => {
                map.set_cursor(Cursor::Default);
            }
            _ => {
                debug!(layer_id, "ignoring pointer event for unmanaged layer");
            }
        }
    }

    /// Handle a click on the cluster layer.
    ///
    /// Leaf expansion is a capability-checked optional operation: when the
    /// backend supports it, the expanded leaves are emitted and the camera
    /// eases to the cluster's expansion zoom; otherwise the dispatcher
    /// degrades to zooming toward the cluster centroid and emits the
    /// cluster feature itself.
    fn cluster_click<M: MapHandle>(&mut self, map: &mut M, point: ScreenPoint) {
        let features = map.query_rendered_features(point, CLUSTER_LAYER_ID);
        let Some(feature) = features.first() else {
            return;
        };
        let Some(cluster_id) = feature.cluster_id() else {
            return;
        };

        let center = feature.coordinate;
        let capped_step = clamp_zoom(map.zoom() + CLUSTER_ZOOM_STEP);

        match map.cluster_leaves(SOURCE_ID, cluster_id, CLUSTER_LEAF_LIMIT) {
            Some(leaves) => {
                if let Some(callback) = self.on_cluster_activate.as_mut() {
                    callback(&leaves);
                }
                let zoom = map
                    .cluster_expansion_zoom(SOURCE_ID, cluster_id)
                    .map_or(capped_step, clamp_zoom);
                map.ease_to(center, zoom);
            }
            None => {
                warn!(
                    cluster_id,
                    "cluster leaf expansion unsupported, zooming toward centroid"
                );
                if let Some(callback) = self.on_cluster_activate.as_mut() {
                    callback(core::slice::from_ref(feature));
                }
                map.ease_to(center, capped_step);
            }
        }
    }

    /// Handle a click on the individual point layer: emit the feature's
    /// properties and show a location-anchored detail popup.
    fn point_click<M: MapHandle>(&mut self, map: &mut M, point: ScreenPoint) {
        let features = map.query_rendered_features(point, UNCLUSTERED_LAYER_ID);
        let Some(feature) = features.first() else {
            return;
        };

        let value = serde_json::Value::Object(feature.properties.clone());
        let properties: EventProperties = match serde_json::from_value(value) {
            Ok(properties) => properties,
            Err(err) => {
                warn!(error = %err, "point feature carried an unexpected property bag");
                return;
            }
        };

        if let Some(callback) = self.on_point_activate.as_mut() {
            callback(&properties);
        }

        map.show_popup(feature.coordinate, &properties.title, &properties.description);
    }
}

/// Clamp a cluster-driven zoom target to the documented ceiling.
fn clamp_zoom(zoom: f64) -> f64 {
    zoom.min(MAX_CLUSTER_ZOOM)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn zoom_is_capped_at_sixteen() {
        assert!((clamp_zoom(10.0) - 10.0).abs() < f64::EPSILON);
        assert!((clamp_zoom(15.5 + CLUSTER_ZOOM_STEP) - MAX_CLUSTER_ZOOM).abs() < f64::EPSILON);
        assert!((clamp_zoom(40.0) - MAX_CLUSTER_ZOOM).abs() < f64::EPSILON);
    }
}
