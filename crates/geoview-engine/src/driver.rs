//! The refresh driver: a select loop bridging the feed poller, the
//! filter bar, and the live map instance into one [`MapSync`].
//!
//! All three inputs funnel through a single loop, so working-set
//! recomputation is serialized and the last-write-wins ordering of the
//! watch channels carries through to the map source.

use chrono::Utc;
use geoview_feed::FeedUpdate;
use geoview_map::{MapError, MapEvent, MapHandle};
use geoview_types::FilterParameters;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::sync::MapSync;

/// Drive a synchronizer from its three input channels until the host
/// closes the map-event channel.
///
/// Feed updates and filter changes arrive over watch channels, so bursts
/// coalesce to the latest value; a closed watch simply disables that
/// input. Map events arrive over an mpsc channel because every gesture
/// must be delivered.
///
/// # Errors
///
/// Returns the first [`MapError`] raised while mutating the map.
pub async fn run<M: MapHandle>(
    sync: &mut MapSync<M>,
    mut feed_updates: watch::Receiver<Option<FeedUpdate>>,
    mut filter_changes: watch::Receiver<FilterParameters>,
    mut map_events: mpsc::Receiver<MapEvent>,
) -> Result<(), MapError> {
    info!("refresh driver starting");
    let mut feed_open = true;
    let mut filters_open = true;

    loop {
        tokio::select! {
            changed = feed_updates.changed(), if feed_open => {
                if changed.is_err() {
                    feed_open = false;
                    continue;
                }
                let update = feed_updates.borrow_and_update().clone();
                if let Some(update) = update {
                    sync.apply_update(&update, Utc::now())?;
                }
            }
            changed = filter_changes.changed(), if filters_open => {
                if changed.is_err() {
                    filters_open = false;
                    continue;
                }
                let filters = filter_changes.borrow_and_update().clone();
                sync.apply_filters(filters, Utc::now())?;
            }
            event = map_events.recv() => {
                let Some(event) = event else {
                    break;
                };
                sync.handle_map_event(event)?;
            }
        }
    }

    debug!("refresh driver stopped, map-event channel closed");
    Ok(())
}
