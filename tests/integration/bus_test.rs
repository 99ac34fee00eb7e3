//! Notification fan-out tests.

use labreserve_core::events::{EventPayload, ReservationEvent};
use labreserve_core::types::Topic;

use crate::helpers::{TestApp, staff, student};

#[tokio::test]
async fn test_requester_topic_receives_approval() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    let requester = student();
    let mut rx = app.bus.subscribe(Topic::Requester(requester.requester_id));

    let ticket = app
        .ledger
        .request_reservation(&requester, pc.id, 30)
        .await
        .unwrap();
    app.ledger.approve(&staff(), ticket.reservation_id).await.unwrap();

    let notification = rx.recv().await.unwrap();
    assert_eq!(
        notification.topic,
        format!("requester:{}", requester.requester_id)
    );
    match notification.payload {
        EventPayload::Reservation(ReservationEvent::Approved { reservation_id, .. }) => {
            assert_eq!(reservation_id, ticket.reservation_id);
        }
        other => panic!("expected approval event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_broadcast_topic_sees_every_occupancy_change() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    let mut rx = app.bus.subscribe(Topic::ResourceStatusBroadcast);

    let ticket = app
        .ledger
        .request_reservation(&student(), pc.id, 30)
        .await
        .unwrap();
    app.ledger.approve(&staff(), ticket.reservation_id).await.unwrap();
    app.ledger.end_early(&staff(), ticket.reservation_id).await.unwrap();

    let mut statuses = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        statuses.push(notification.status);
    }
    assert_eq!(statuses, vec!["queued", "occupied", "available"]);
}

#[tokio::test]
async fn test_publishing_without_subscribers_never_fails_the_operation() {
    // Nobody subscribes to anything; every operation still succeeds.
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    let ticket = app
        .ledger
        .request_reservation(&student(), pc.id, 30)
        .await
        .unwrap();
    app.ledger.approve(&staff(), ticket.reservation_id).await.unwrap();
    app.ledger.end_early(&staff(), ticket.reservation_id).await.unwrap();
}

#[tokio::test]
async fn test_staff_alerts_carry_new_requests() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    let mut rx = app.bus.subscribe(Topic::StaffAlerts);

    let ticket = app
        .ledger
        .request_reservation(&student(), pc.id, 30)
        .await
        .unwrap();

    let notification = rx.recv().await.unwrap();
    assert_eq!(notification.payload.reservation_id(), Some(ticket.reservation_id));
}
