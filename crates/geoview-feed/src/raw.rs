//! Serde model of the upstream GeoJSON feed response.
//!
//! The model is deliberately permissive: every property is optional and
//! coordinates are kept as raw JSON values. A single corrupted record must
//! not fail the whole refresh, so strictness lives in the normalizer,
//! which drops unusable records one at a time.

use serde::Deserialize;

/// Feed-level metadata carried alongside the features.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedMetadata {
    /// When the upstream generated this response, epoch milliseconds.
    /// Displayed as "last updated" by the dashboard.
    #[serde(default)]
    pub generated: Option<i64>,
    /// Upstream feed title, e.g. "USGS All Earthquakes, Past Day".
    #[serde(default)]
    pub title: Option<String>,
}

/// Raw feature properties as the feed reports them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProperties {
    /// Headline for the event.
    #[serde(default)]
    pub title: Option<String>,
    /// Magnitude; absent or null for some records.
    #[serde(default)]
    pub mag: Option<f64>,
    /// Occurrence time, epoch milliseconds.
    #[serde(default)]
    pub time: Option<i64>,
    /// Free-text location label.
    #[serde(default)]
    pub place: Option<String>,
    /// Event category string, e.g. "earthquake".
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Review status string, e.g. "automatic".
    #[serde(default)]
    pub status: Option<String>,
    /// Detail page URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// Raw geometry with coordinates kept as JSON values.
///
/// `coordinates` is `[lon, lat, depth_km]` when well-formed; keeping the
/// elements as [`serde_json::Value`] lets the normalizer detect and drop
/// individual records with missing or non-numeric coordinates instead of
/// failing the whole response decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeometry {
    /// The raw coordinate array.
    #[serde(default)]
    pub coordinates: Vec<serde_json::Value>,
}

/// One raw feature from the feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFeature {
    /// Feed-unique event identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Nested properties.
    #[serde(default)]
    pub properties: RawProperties,
    /// Nested geometry; absent for fully corrupted records.
    #[serde(default)]
    pub geometry: Option<RawGeometry>,
}

/// The full feed response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedResponse {
    /// All raw features in feed order.
    #[serde(default)]
    pub features: Vec<RawFeature>,
    /// Feed-level metadata.
    #[serde(default)]
    pub metadata: FeedMetadata,
}
