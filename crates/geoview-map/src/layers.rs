//! The source/layer catalog: ids, clustering parameters, and paint
//! expressions.
//!
//! Paint thresholds are product-level constants: cluster circles step by
//! contained-point count (small/medium/large tiers at 10 and 30 points),
//! individual points interpolate continuously by magnitude across fixed
//! stops (0 gray, 1 green, 3 amber, 5 red). They are carried as MapLibre
//! JSON expressions because that is what the backend consumes.

use geoview_types::FeatureCollection;
use serde_json::json;

use crate::handle::{LayerKind, LayerSpec, SourceSpec};

/// Id of the clustering point-data source.
pub const SOURCE_ID: &str = "earthquake-source";

/// Id of the aggregated cluster circle layer.
pub const CLUSTER_LAYER_ID: &str = "earthquake-clusters";

/// Id of the cluster point-count label layer.
pub const CLUSTER_COUNT_LAYER_ID: &str = "earthquake-cluster-count";

/// Id of the individual (unclustered) point layer.
pub const UNCLUSTERED_LAYER_ID: &str = "earthquake-unclustered";

/// The three layer ids in their removal order (layers before source).
pub const LAYER_IDS: [&str; 3] = [
    CLUSTER_COUNT_LAYER_ID,
    CLUSTER_LAYER_ID,
    UNCLUSTERED_LAYER_ID,
];

/// Build the clustering source specification.
pub fn source_spec(
    data: FeatureCollection,
    cluster_radius: u32,
    cluster_max_zoom: u32,
) -> SourceSpec {
    SourceSpec {
        id: SOURCE_ID.to_owned(),
        data,
        cluster: true,
        cluster_radius,
        cluster_max_zoom,
    }
}

/// Build the cluster circle layer: color and radius step by point count.
pub fn cluster_circle_layer() -> LayerSpec {
    LayerSpec {
        id: CLUSTER_LAYER_ID.to_owned(),
        source: SOURCE_ID.to_owned(),
        kind: LayerKind::Circle,
        filter: json!(["has", "point_count"]),
        layout: json!({}),
        paint: json!({
            "circle-color": [
                "step",
                ["get", "point_count"],
                "#6366f1",
                10, "#8b5cf6",
                30, "#ec4899"
            ],
            "circle-radius": [
                "step",
                ["get", "point_count"],
                20,
                10, 30,
                30, 40
            ],
            "circle-stroke-width": 2,
            "circle-stroke-color": "#ffffff"
        }),
    }
}

/// Build the cluster count label layer.
pub fn cluster_count_layer() -> LayerSpec {
    LayerSpec {
        id: CLUSTER_COUNT_LAYER_ID.to_owned(),
        source: SOURCE_ID.to_owned(),
        kind: LayerKind::Symbol,
        filter: json!(["has", "point_count"]),
        layout: json!({
            "text-field": "{point_count_abbreviated}",
            "text-size": 14,
            "text-font": ["Open Sans Regular"]
        }),
        paint: json!({
            "text-color": "#ffffff"
        }),
    }
}

/// Build the individual point layer: color and radius interpolate by
/// magnitude.
pub fn unclustered_layer() -> LayerSpec {
    LayerSpec {
        id: UNCLUSTERED_LAYER_ID.to_owned(),
        source: SOURCE_ID.to_owned(),
        kind: LayerKind::Circle,
        filter: json!(["!", ["has", "point_count"]]),
        layout: json!({}),
        paint: json!({
            "circle-color": [
                "interpolate",
                ["linear"],
                ["get", "magnitude"],
                0, "#6b7280",
                1, "#10b981",
                3, "#f59e0b",
                5, "#dc2626"
            ],
            "circle-radius": [
                "interpolate",
                ["linear"],
                ["get", "magnitude"],
                0, 8,
                1, 10,
                3, 14,
                5, 18
            ],
            "circle-stroke-width": 2,
            "circle-stroke-color": "#ffffff",
            "circle-opacity": 0.85
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_ids_are_distinct() {
        assert_ne!(CLUSTER_LAYER_ID, CLUSTER_COUNT_LAYER_ID);
        assert_ne!(CLUSTER_LAYER_ID, UNCLUSTERED_LAYER_ID);
        assert!(LAYER_IDS.contains(&CLUSTER_LAYER_ID));
    }

    #[test]
    fn cluster_layers_filter_on_point_count() {
        let circle = cluster_circle_layer();
        let count = cluster_count_layer();
        assert_eq!(circle.filter, count.filter);
        assert_eq!(circle.source, SOURCE_ID);
        assert_eq!(circle.kind, LayerKind::Circle);
        assert_eq!(count.kind, LayerKind::Symbol);
    }

    #[test]
    fn unclustered_layer_excludes_clusters() {
        let layer = unclustered_layer();
        let filter = layer.filter.as_array().cloned().unwrap_or_default();
        assert_eq!(filter.first().and_then(|v| v.as_str()), Some("!"));
    }

    #[test]
    fn magnitude_paint_stops_cover_the_domain() {
        let layer = unclustered_layer();
        let radius = layer
            .paint
            .pointer("/circle-radius")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        // interpolate, linear, get-expr, then four (stop, value) pairs.
        assert_eq!(radius.len(), 11);
    }
}
