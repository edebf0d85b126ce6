//! Projection of the working set into the map source's feature
//! collection.
//!
//! This is the source-update boundary where the closed
//! [`EventProperties`] bag is built. The normalizer already rejects
//! records without numeric coordinates; the finiteness check here is a
//! defensive double-check, because a NaN coordinate reaching the source
//! silently breaks clustering.

use geoview_types::{Event, EventProperties, FeatureCollection, PointFeature};
use tracing::debug;

/// Build the popup body text for an event.
fn describe(event: &Event) -> String {
    if event.place.is_empty() {
        format!(
            "Magnitude {:.1} at {:.1} km depth",
            event.magnitude, event.position.depth_km
        )
    } else {
        format!(
            "Magnitude {:.1} at {:.1} km depth, {}",
            event.magnitude, event.position.depth_km, event.place
        )
    }
}

/// Project one event into a GeoJSON feature, or `None` when its
/// coordinates are not plottable.
pub fn project_event(event: &Event) -> Option<PointFeature> {
    if !event.position.is_plottable() {
        debug!(id = %event.id, "excluding event with non-finite coordinates");
        return None;
    }

    let properties = EventProperties {
        id: event.id.as_str().to_owned(),
        magnitude: event.magnitude,
        title: event.title.clone(),
        description: describe(event),
        place: event.place.clone(),
        time: event.time_occurred.timestamp_millis(),
        depth_km: event.position.depth_km,
        kind: event.kind,
        status: event.status,
        detail_url: event.detail_url.clone(),
    };

    Some(PointFeature::new(properties, event.position.lng_lat()))
}

/// Project the whole working set, preserving its order.
pub fn project_working_set(events: &[Event]) -> FeatureCollection {
    FeatureCollection::new(events.iter().filter_map(project_event).collect())
}
