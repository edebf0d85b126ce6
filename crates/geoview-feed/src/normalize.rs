//! Normalization of raw feed records into canonical events.
//!
//! Contract (feed tolerance rules):
//!
//! - missing magnitude defaults to 0
//! - missing depth defaults to 0
//! - coordinates are taken verbatim, no reprojection
//! - a record without numeric longitude and latitude is dropped silently;
//!   the refresh as a whole always succeeds

use chrono::{DateTime, Utc};
use geoview_types::{Event, EventId, EventKind, EventStatus, Position};
use tracing::{debug, warn};

use crate::raw::{FeedResponse, RawFeature};

/// Normalize one raw feature into an [`Event`].
///
/// Returns `None` (with a debug log) when the record has no id or its
/// longitude/latitude are absent or non-numeric.
pub fn normalize_feature(raw: &RawFeature) -> Option<Event> {
    let Some(id) = raw.id.as_deref().filter(|id| !id.is_empty()) else {
        debug!("dropping feed record without an id");
        return None;
    };

    let Some(geometry) = raw.geometry.as_ref() else {
        debug!(id, "dropping feed record without geometry");
        return None;
    };

    let longitude = geometry.coordinates.first().and_then(serde_json::Value::as_f64);
    let latitude = geometry.coordinates.get(1).and_then(serde_json::Value::as_f64);
    let (Some(longitude), Some(latitude)) = (longitude, latitude) else {
        debug!(id, "dropping feed record with non-numeric coordinates");
        return None;
    };

    let depth_km = geometry
        .coordinates
        .get(2)
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(0.0);

    let props = &raw.properties;
    let time_occurred = props
        .time
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or_else(Utc::now);

    Some(Event {
        id: EventId::from(id),
        position: Position {
            longitude,
            latitude,
            depth_km,
        },
        magnitude: props.mag.unwrap_or(0.0),
        time_occurred,
        title: props.title.clone().unwrap_or_default(),
        place: props.place.clone().unwrap_or_default(),
        kind: props
            .kind
            .as_deref()
            .map_or(EventKind::Other, EventKind::from_feed),
        status: props
            .status
            .as_deref()
            .map_or(EventStatus::Other, EventStatus::from_feed),
        detail_url: props.url.clone().unwrap_or_default(),
    })
}

/// Normalize a whole feed response, preserving feed order.
///
/// Unusable records are dropped individually; when any are dropped a
/// warning reports the count. Returns the events together with the
/// upstream generation timestamp when present.
pub fn normalize_response(response: &FeedResponse) -> (Vec<Event>, Option<DateTime<Utc>>) {
    let total = response.features.len();
    let events: Vec<Event> = response.features.iter().filter_map(normalize_feature).collect();

    let dropped = total.saturating_sub(events.len());
    if dropped > 0 {
        warn!(dropped, total, "feed refresh dropped unusable records");
    }

    let generated_at = response
        .metadata
        .generated
        .and_then(DateTime::<Utc>::from_timestamp_millis);

    (events, generated_at)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::raw::{RawGeometry, RawProperties};
    use serde_json::json;

    fn raw_feature(id: &str, coords: Vec<serde_json::Value>) -> RawFeature {
        RawFeature {
            id: Some(id.to_owned()),
            properties: RawProperties {
                title: Some(format!("M ? - {id}")),
                mag: Some(2.5),
                time: Some(1_700_000_000_000),
                place: Some("somewhere".to_owned()),
                kind: Some("earthquake".to_owned()),
                status: Some("automatic".to_owned()),
                url: Some("https://example.org".to_owned()),
            },
            geometry: Some(RawGeometry { coordinates: coords }),
        }
    }

    #[test]
    fn normalizes_a_complete_record() {
        let raw = raw_feature("us1", vec![json!(-118.2), json!(34.1), json!(7.5)]);
        let event = normalize_feature(&raw).unwrap();
        assert_eq!(event.id.as_str(), "us1");
        assert!((event.position.longitude - -118.2).abs() < f64::EPSILON);
        assert!((event.position.depth_km - 7.5).abs() < f64::EPSILON);
        assert_eq!(event.kind, EventKind::Earthquake);
        assert_eq!(event.status, EventStatus::Automatic);
    }

    #[test]
    fn missing_magnitude_defaults_to_zero() {
        let mut raw = raw_feature("us2", vec![json!(0.0), json!(0.0)]);
        raw.properties.mag = None;
        let event = normalize_feature(&raw).unwrap();
        assert!(event.magnitude.abs() < f64::EPSILON);
    }

    #[test]
    fn missing_depth_defaults_to_zero() {
        let raw = raw_feature("us3", vec![json!(10.0), json!(20.0)]);
        let event = normalize_feature(&raw).unwrap();
        assert!(event.position.depth_km.abs() < f64::EPSILON);
    }

    #[test]
    fn non_numeric_coordinates_drop_the_record() {
        let raw = raw_feature("us4", vec![json!("east"), json!(34.1)]);
        assert!(normalize_feature(&raw).is_none());

        let raw = raw_feature("us5", vec![json!(-118.2)]);
        assert!(normalize_feature(&raw).is_none());

        let mut raw = raw_feature("us6", vec![json!(-118.2), json!(34.1)]);
        raw.geometry = None;
        assert!(normalize_feature(&raw).is_none());
    }

    #[test]
    fn missing_id_drops_the_record() {
        let mut raw = raw_feature("", vec![json!(-118.2), json!(34.1)]);
        raw.id = None;
        assert!(normalize_feature(&raw).is_none());
    }

    #[test]
    fn response_drops_only_the_corrupt_records() {
        let response = FeedResponse {
            features: vec![
                raw_feature("good1", vec![json!(1.0), json!(2.0), json!(3.0)]),
                raw_feature("bad", vec![json!(null), json!(2.0)]),
                raw_feature("good2", vec![json!(4.0), json!(5.0)]),
            ],
            metadata: crate::raw::FeedMetadata {
                generated: Some(1_700_000_000_000),
                title: None,
            },
        };

        let (events, generated_at) = normalize_response(&response);
        assert_eq!(events.len(), 2);
        // Feed order is preserved for the survivors.
        assert_eq!(events.first().map(|e| e.id.as_str()), Some("good1"));
        assert_eq!(events.get(1).map(|e| e.id.as_str()), Some("good2"));
        assert!(generated_at.is_some());
    }
}
