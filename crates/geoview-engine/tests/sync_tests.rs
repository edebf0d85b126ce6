//! End-to-end tests for the synchronizer and the refresh driver, over
//! the scripted in-memory map.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, Duration, Utc};
use geoview_engine::{EngineConfig, MapSync, driver};
use geoview_feed::FeedUpdate;
use geoview_map::testing::FakeMap;
use geoview_map::MapEvent;
use geoview_types::{
    Event, EventId, EventKind, EventStatus, FilterParameters, Position, RegionFilter, TimeWindow,
};
use tokio::sync::{mpsc, watch};

fn event(id: &str, magnitude: f64, age: Duration, place: &str) -> Event {
    Event {
        id: EventId::from(id),
        position: Position {
            longitude: -120.0,
            latitude: 38.0,
            depth_km: 6.0,
        },
        magnitude,
        time_occurred: Utc::now().checked_sub_signed(age).unwrap(),
        title: format!("M {magnitude:.1} - {place}"),
        place: place.to_owned(),
        kind: EventKind::Earthquake,
        status: EventStatus::Automatic,
        detail_url: String::new(),
    }
}

fn update(events: Vec<Event>, fetched_at: DateTime<Utc>) -> FeedUpdate {
    FeedUpdate {
        events,
        generated_at: Some(fetched_at),
        fetched_at,
    }
}

fn installed_sync() -> MapSync<FakeMap> {
    let mut sync = MapSync::new(FakeMap::with_loaded_style(), &EngineConfig::default());
    sync.ensure_installed().unwrap();
    sync
}

#[test]
fn feed_update_flows_into_source_and_snapshot() {
    let now = Utc::now();
    let mut sync = installed_sync();
    let mut snapshots = sync.snapshots();

    sync.apply_update(
        &update(
            vec![
                event("small", 2.0, Duration::minutes(10), "Nevada"),
                event("big", 5.5, Duration::minutes(20), "Nevada"),
            ],
            now,
        ),
        now,
    )
    .unwrap();

    // The map source holds the projected working set.
    assert_eq!(
        sync.map().source_data("earthquake-source").map(|d| d.len()),
        Some(2)
    );

    // The snapshot is sorted strongest-first and carries the stats.
    assert!(snapshots.has_changed().unwrap());
    let snapshot = snapshots.borrow_and_update().clone();
    assert_eq!(
        snapshot.events.first().map(|e| e.id.as_str()),
        Some("big")
    );
    assert_eq!(snapshot.stats.total, 2);
    assert!((snapshot.stats.max_magnitude - 5.5).abs() < f64::EPSILON);
    assert_eq!(snapshot.stats.last_hour_count, 2);
    assert_eq!(snapshot.refreshed_at, Some(now));
}

#[test]
fn filter_change_recomputes_without_a_new_fetch() {
    let now = Utc::now();
    let mut sync = installed_sync();
    let batch = update(
        vec![
            event("weak", 1.0, Duration::minutes(5), "Southern California"),
            event("strong", 4.5, Duration::minutes(5), "Alaska Peninsula"),
        ],
        now,
    );
    sync.apply_update(&batch, now).unwrap();

    sync.apply_filters(
        FilterParameters {
            min_magnitude: 3.0,
            ..FilterParameters::default()
        },
        now,
    )
    .unwrap();
    assert_eq!(
        sync.map().source_data("earthquake-source").map(|d| d.len()),
        Some(1)
    );

    // Relaxing the filter restores the hidden event from the retained
    // raw batch.
    sync.apply_filters(FilterParameters::default(), now).unwrap();
    assert_eq!(
        sync.map().source_data("earthquake-source").map(|d| d.len()),
        Some(2)
    );
}

#[test]
fn combined_filters_are_anded() {
    let now = Utc::now();
    let mut sync = installed_sync();
    let mut snapshots = sync.snapshots();
    sync.apply_update(
        &update(
            vec![
                event("match", 4.0, Duration::minutes(30), "Japan region"),
                event("too_old", 4.0, Duration::hours(2), "Japan region"),
                event("wrong_place", 4.0, Duration::minutes(30), "Chile"),
            ],
            now,
        ),
        now,
    )
    .unwrap();

    sync.apply_filters(
        FilterParameters {
            min_magnitude: 3.0,
            time_window: TimeWindow::OneHour,
            region: RegionFilter::parse("japan"),
        },
        now,
    )
    .unwrap();

    let snapshot = snapshots.borrow_and_update().clone();
    assert_eq!(snapshot.stats.total, 1);
    assert_eq!(
        snapshot.events.first().map(|e| e.id.as_str()),
        Some("match")
    );
}

#[test]
fn updates_before_install_are_carried_into_the_source() {
    let now = Utc::now();
    let mut sync = MapSync::new(FakeMap::new(), &EngineConfig::default());
    sync.apply_update(
        &update(vec![event("early", 3.0, Duration::minutes(1), "Nevada")], now),
        now,
    )
    .unwrap();

    // Snapshots publish even while the map is not ready.
    assert_eq!(sync.snapshots().borrow().stats.total, 1);

    sync.map_mut().finish_style_load();
    sync.handle_map_event(MapEvent::StyleLoaded).unwrap();
    assert_eq!(
        sync.map().source_data("earthquake-source").map(|d| d.len()),
        Some(1)
    );
}

#[test]
fn snapshot_channel_is_last_write_wins() {
    let now = Utc::now();
    let mut sync = installed_sync();
    let mut snapshots = sync.snapshots();

    for magnitude in [1.0, 2.0, 3.0] {
        sync.apply_update(
            &update(
                vec![event("ev", magnitude, Duration::minutes(1), "Nevada")],
                now,
            ),
            now,
        )
        .unwrap();
    }

    // Only the latest working set is observable.
    let snapshot = snapshots.borrow_and_update().clone();
    assert!((snapshot.stats.max_magnitude - 3.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn driver_serializes_feed_and_filter_inputs() {
    let now = Utc::now();
    let sync = installed_sync();
    let mut snapshots = sync.snapshots();

    let (feed_tx, feed_rx) = watch::channel(None);
    let (filter_tx, filter_rx) = watch::channel(FilterParameters::default());
    let (event_tx, event_rx) = mpsc::channel(8);

    let handle = tokio::spawn(async move {
        let mut sync = sync;
        driver::run(&mut sync, feed_rx, filter_rx, event_rx)
            .await
            .map(|()| sync)
    });

    feed_tx.send_replace(Some(update(
        vec![
            event("weak", 1.5, Duration::minutes(5), "Nevada"),
            event("strong", 6.0, Duration::minutes(5), "Nevada"),
        ],
        now,
    )));
    snapshots.changed().await.unwrap();
    assert_eq!(snapshots.borrow_and_update().stats.total, 2);

    filter_tx.send_replace(FilterParameters {
        min_magnitude: 3.0,
        ..FilterParameters::default()
    });
    snapshots.changed().await.unwrap();
    assert_eq!(snapshots.borrow_and_update().stats.total, 1);

    // A forwarded map event reaches the manager.
    event_tx.send(MapEvent::StyleLoaded).await.unwrap();

    // Closing the host channel stops the driver cleanly.
    drop(event_tx);
    let sync = handle.await.unwrap().unwrap();
    assert_eq!(
        sync.map().source_data("earthquake-source").map(|d| d.len()),
        Some(1)
    );
}

#[test]
fn teardown_detaches_listeners_and_silences_events() {
    let mut sync = installed_sync();
    assert_eq!(sync.map().listener_total(), 6);

    sync.teardown();
    assert_eq!(sync.map().listener_total(), 0);

    // Events after teardown are ignored, never errors.
    sync.handle_map_event(MapEvent::StyleLoaded).unwrap();
    let map = sync.into_map();
    assert_eq!(map.listener_total(), 0);
}
