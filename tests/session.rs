//! Tests for a mounted map session fed with raw server messages.


use fleet_motion::{Coordinate, VehiclePosition};
use live_map::{MapBounds, MapSession};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::provider::{ManualClock, RecordingPublisher, config, positions_message, wait_for};

#[tokio::test]
async fn animates_server_positions() {
    let clock = ManualClock::default();
    let session =
        MapSession::mount_with_clock(config(false), RecordingPublisher::default(), clock.clone());
    let mut positions = session.subscribe();

    session.on_message(&positions_message(&[("1", 0.0, 0.0, 0.0)])).await.expect("should queue");
    wait_for(&mut positions, |s| s.contains("1")).await;

    clock.set(1_000);
    let second = positions_message(&[("1", 0.0, 10.0, 90.0), ("2", 1.0, 1.0, 0.0)]);
    session.on_message(&second).await.expect("should queue");
    let snapshot = wait_for(&mut positions, |s| s.contains("2")).await;
    assert_eq!(snapshot.get("1"), Some(&VehiclePosition::new(0.0, 0.0, 0.0)));

    clock.set(1_500);
    let snapshot = wait_for(&mut positions, |s| {
        s.get("1").is_some_and(|p| (p.longitude - 5.0).abs() < 1e-6)
    })
    .await;
    let current = snapshot.get("1").expect("tracked");
    assert!((current.bearing - 45.0).abs() < 1e-9);
    assert_eq!(session.positions(), snapshot);

    session.unmount().await.expect("should unmount");
}

#[tokio::test]
async fn selection_requests_route() {
    let clock = ManualClock::default();
    let publisher = RecordingPublisher::default();
    let mut session = MapSession::mount_with_clock(config(false), publisher.clone(), clock);
    let mut positions = session.subscribe();

    let err = session.select_vehicle("9031005990").await.expect_err("not on the map yet");
    assert_eq!(err.code(), "not_found");
    assert!(publisher.sent().is_empty());

    session
        .on_message(&positions_message(&[("9031005990", 59.8585, 17.6389, 270.0)]))
        .await
        .expect("should queue");
    wait_for(&mut positions, |s| s.contains("9031005990")).await;

    session.select_vehicle("9031005990").await.expect("should select");
    assert_eq!(session.selected(), Some("9031005990"));
    assert_eq!(session.selected_position(), Some(VehiclePosition::new(59.8585, 17.6389, 270.0)));
    assert_eq!(
        publisher.sent(),
        vec![json!({"type": "get-route-info", "payload": {"line": "9031005990"}})]
    );

    session.clear_selection();
    assert_eq!(session.selected(), None);
    assert_eq!(session.selected_position(), None);
}

#[tokio::test]
async fn selected_vehicle_leaves_map() {
    let clock = ManualClock::default();
    let mut session =
        MapSession::mount_with_clock(config(false), RecordingPublisher::default(), clock.clone());
    let mut positions = session.subscribe();

    session.on_message(&positions_message(&[("1", 0.0, 0.0, 0.0)])).await.expect("should queue");
    wait_for(&mut positions, |s| s.contains("1")).await;
    session.select_vehicle("1").await.expect("should select");

    clock.set(1_000);
    session.on_message(&positions_message(&[("2", 1.0, 1.0, 0.0)])).await.expect("should queue");
    wait_for(&mut positions, |s| !s.contains("1")).await;

    assert_eq!(session.selected(), Some("1"));
    assert_eq!(session.selected_position(), None);
}

#[tokio::test]
async fn viewport_updates_disabled() {
    let publisher = RecordingPublisher::default();
    let session = MapSession::mount_with_clock(config(false), publisher.clone(), ManualClock::default());

    let bounds = MapBounds::new(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
    session.bounds_changed(bounds).await.expect("should ignore");
    assert!(publisher.sent().is_empty());
}

#[tokio::test]
async fn viewport_updates_enabled() {
    let publisher = RecordingPublisher::default();
    let session = MapSession::mount_with_clock(config(true), publisher.clone(), ManualClock::default());

    let bounds = MapBounds::new(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
    session.bounds_changed(bounds).await.expect("should publish");

    let sent = publisher.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["type"], "geo-position-update");
    assert_eq!(sent[0]["payload"]["position"], json!({"type": "Point", "coordinates": [0.0, 0.0]}));

    let radius = sent[0]["payload"]["maxDistance"].as_f64().expect("number");
    assert!((radius - 111_195.08).abs() < 1.0);
}

#[tokio::test]
async fn publisher_closed() {
    let clock = ManualClock::default();
    let mut session = MapSession::mount_with_clock(config(false), RecordingPublisher::closed(), clock);
    let mut positions = session.subscribe();

    session.on_message(&positions_message(&[("1", 0.0, 0.0, 0.0)])).await.expect("should queue");
    wait_for(&mut positions, |s| s.contains("1")).await;

    let err = session.select_vehicle("1").await.expect_err("should fail");
    assert_eq!(err.code(), "channel_closed");
}

#[tokio::test]
async fn other_messages_ignored() {
    let session =
        MapSession::mount_with_clock(config(false), RecordingPublisher::default(), ManualClock::default());

    session
        .on_message(br#"{"type": "route-info", "payload": {"line": "3"}}"#)
        .await
        .expect("should ignore");
    assert!(session.positions().is_empty());
}

#[tokio::test]
async fn invalid_message() {
    let session =
        MapSession::mount_with_clock(config(false), RecordingPublisher::default(), ManualClock::default());

    let err = session.on_message(b"not json").await.expect_err("should fail");
    assert_eq!(err.code(), "invalid_format");

    let err = session
        .on_message(br#"{"type": "vehicle-positions", "payload": {"positions": [{"id": "1"}]}}"#)
        .await
        .expect_err("should fail");
    assert_eq!(err.code(), "invalid_format");
}

#[tokio::test]
async fn dropping_stops_driver() {
    let session =
        MapSession::mount_with_clock(config(false), RecordingPublisher::default(), ManualClock::default());
    let mut positions = session.subscribe();
    drop(session);

    tokio::time::timeout(std::time::Duration::from_secs(1), async {
        while positions.changed().await.is_ok() {}
    })
    .await
    .expect("driver should stop when the session is dropped");
}

#[tokio::test]
async fn rejects_bad_input() {
    let publisher = RecordingPublisher::default();
    let mut session =
        MapSession::mount_with_clock(config(true), publisher.clone(), ManualClock::default());

    let err = session.select_vehicle("").await.expect_err("empty id");
    assert_eq!(err.code(), "bad_request");

    let bounds = MapBounds::new(Coordinate::new(f64::NAN, 0.0), Coordinate::new(0.0, 1.0));
    let err = session.bounds_changed(bounds).await.expect_err("not finite");
    assert_eq!(err.code(), "bad_request");
    assert!(publisher.sent().is_empty());
}
