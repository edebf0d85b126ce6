//! Narrow GeoJSON projection handed to the map's point-data source.
//!
//! The original implementation spread an open-ended property dictionary
//! into each feature. Here the projection is a closed [`EventProperties`]
//! bag built at the source-update boundary: exactly the fields the layer
//! paint expressions and popups consume, nothing else.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EventKind, EventStatus};

/// GeoJSON `type` marker for a feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum FeatureType {
    /// The only feature type this source carries.
    #[default]
    Feature,
}

/// GeoJSON `type` marker for a point geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum GeometryType {
    /// The only geometry type this source carries.
    #[default]
    Point,
}

/// GeoJSON `type` marker for the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CollectionType {
    /// The only collection type this source carries.
    #[default]
    FeatureCollection,
}

/// The closed per-feature property bag.
///
/// `magnitude` drives the point layer's paint interpolation; `title` and
/// `description` feed the detail popup; the remaining fields let external
/// consumers (table, detail panel) resolve the event without reaching
/// into map internals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventProperties {
    /// Feed-unique event id.
    pub id: String,
    /// Magnitude (0 when the feed omitted it).
    pub magnitude: f64,
    /// Headline shown as the popup title.
    pub title: String,
    /// Popup body text.
    pub description: String,
    /// Free-text location label.
    pub place: String,
    /// Occurrence time as epoch milliseconds.
    pub time: i64,
    /// Hypocenter depth in kilometers.
    pub depth_km: f64,
    /// Seismic event category.
    pub kind: EventKind,
    /// Review status.
    pub status: EventStatus,
    /// Upstream detail page URL.
    pub detail_url: String,
}

/// A GeoJSON point geometry in `[longitude, latitude]` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PointGeometry {
    /// Always [`GeometryType::Point`].
    #[serde(rename = "type")]
    pub geometry_type: GeometryType,
    /// `[longitude, latitude]`.
    pub coordinates: [f64; 2],
}

impl PointGeometry {
    /// Build a point geometry from a `[longitude, latitude]` pair.
    pub const fn new(coordinates: [f64; 2]) -> Self {
        Self {
            geometry_type: GeometryType::Point,
            coordinates,
        }
    }
}

/// One GeoJSON feature of the working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PointFeature {
    /// Always [`FeatureType::Feature`].
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    /// The closed property bag.
    pub properties: EventProperties,
    /// The point geometry.
    pub geometry: PointGeometry,
}

impl PointFeature {
    /// Build a feature from a property bag and a `[longitude, latitude]`
    /// pair.
    pub const fn new(properties: EventProperties, coordinates: [f64; 2]) -> Self {
        Self {
            feature_type: FeatureType::Feature,
            properties,
            geometry: PointGeometry::new(coordinates),
        }
    }
}

/// The feature collection uploaded to the map's point-data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FeatureCollection {
    /// Always [`CollectionType::FeatureCollection`].
    #[serde(rename = "type")]
    pub collection_type: CollectionType,
    /// One feature per plottable working-set entry.
    pub features: Vec<PointFeature>,
}

impl FeatureCollection {
    /// Build a collection from already-projected features.
    pub const fn new(features: Vec<PointFeature>) -> Self {
        Self {
            collection_type: CollectionType::FeatureCollection,
            features,
        }
    }

    /// Number of features in the collection.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection carries no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_properties() -> EventProperties {
        EventProperties {
            id: "us7000test".to_owned(),
            magnitude: 3.2,
            title: "M 3.2 - offshore".to_owned(),
            description: "Magnitude 3.2 at 12.0 km depth".to_owned(),
            place: "offshore".to_owned(),
            time: 1_700_000_000_000,
            depth_km: 12.0,
            kind: EventKind::Earthquake,
            status: EventStatus::Automatic,
            detail_url: "https://example.org".to_owned(),
        }
    }

    #[test]
    fn collection_serializes_with_geojson_type_tags() {
        let collection =
            FeatureCollection::new(vec![PointFeature::new(sample_properties(), [-118.2, 34.1])]);
        let value = serde_json::to_value(&collection).ok();
        assert!(value.is_some());
        let value = value.unwrap_or_default();
        assert_eq!(
            value.get("type").and_then(|v| v.as_str()),
            Some("FeatureCollection")
        );
        let feature = value
            .get("features")
            .and_then(|f| f.as_array())
            .and_then(|f| f.first())
            .cloned()
            .unwrap_or_default();
        assert_eq!(feature.get("type").and_then(|v| v.as_str()), Some("Feature"));
        assert_eq!(
            feature
                .pointer("/geometry/type")
                .and_then(|v| v.as_str()),
            Some("Point")
        );
        assert_eq!(
            feature
                .pointer("/geometry/coordinates/0")
                .and_then(serde_json::Value::as_f64),
            Some(-118.2)
        );
    }

    #[test]
    fn empty_collection_is_empty() {
        let collection = FeatureCollection::default();
        assert!(collection.is_empty());
        assert_eq!(collection.len(), 0);
    }
}
