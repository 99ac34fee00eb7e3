//! Expiry and warning sweep tests.

use chrono::{Duration, Utc};

use labreserve_core::events::{EventPayload, ReservationEvent};
use labreserve_core::types::Topic;
use labreserve_database::{ReservationStore, ResourceStore};
use labreserve_entity::reservation::ReservationStatus;
use labreserve_entity::resource::Occupancy;

use crate::helpers::{TestApp, staff, student};

#[tokio::test]
async fn test_expiry_is_idempotent() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    let ticket = app
        .ledger
        .request_reservation(&student(), pc.id, 30)
        .await
        .unwrap();
    let approved = app.ledger.approve(&staff(), ticket.reservation_id).await.unwrap();

    let mut status_rx = app.bus.subscribe(Topic::Resource(pc.id));

    let after_end = approved.end_time.unwrap() + Duration::seconds(1);
    assert_eq!(app.ledger.expire_due(after_end).await.unwrap(), 1);
    // Second pass over the already-completed reservation is a no-op.
    assert_eq!(app.ledger.expire_due(after_end).await.unwrap(), 0);
    assert_eq!(app.ledger.expire_due(after_end + Duration::seconds(10)).await.unwrap(), 0);

    let reservation = app.ledger.get_reservation(ticket.reservation_id).await.unwrap();
    assert_eq!(reservation.status, ReservationStatus::Completed);
    let resource = app.resources.find_by_id(pc.id).await.unwrap().unwrap();
    assert_eq!(resource.occupancy, Occupancy::Available);

    // Exactly one "available" status push came out of the two passes.
    let mut available_events = 0;
    while let Ok(notification) = status_rx.try_recv() {
        if notification.status == "available" {
            available_events += 1;
        }
    }
    assert_eq!(available_events, 1);
}

#[tokio::test]
async fn test_warning_fires_exactly_once_under_fast_cadence() {
    // Scenario: session ends in 4m45s; ticks at T and T+8s produce one
    // warning with minutes_left = 5.
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    let ticket = app
        .ledger
        .request_reservation(&student(), pc.id, 30)
        .await
        .unwrap();
    app.ledger.approve(&staff(), ticket.reservation_id).await.unwrap();

    let t = Utc::now();
    let mut reservation = app.ledger.get_reservation(ticket.reservation_id).await.unwrap();
    reservation.end_time = Some(t + Duration::seconds(285));
    app.reservations.update(&reservation).await.unwrap();

    let mut rx = app.bus.subscribe(Topic::Resource(pc.id));

    app.sweep.tick(t).await;
    app.sweep.tick(t + Duration::seconds(8)).await;

    let mut warnings = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        if let EventPayload::Reservation(ReservationEvent::EndingSoon { minutes_left, .. }) =
            notification.payload
        {
            warnings.push(minutes_left);
        }
    }
    assert_eq!(warnings, vec![5]);

    let warned = app.ledger.get_reservation(ticket.reservation_id).await.unwrap();
    assert!(warned.warned_at.is_some());
}

#[tokio::test]
async fn test_session_outside_warning_window_is_not_warned() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    let ticket = app
        .ledger
        .request_reservation(&student(), pc.id, 30)
        .await
        .unwrap();
    app.ledger.approve(&staff(), ticket.reservation_id).await.unwrap();

    // 30 minutes out: far beyond the 5-minute lead.
    app.sweep.tick(Utc::now()).await;

    let reservation = app.ledger.get_reservation(ticket.reservation_id).await.unwrap();
    assert!(reservation.warned_at.is_none());
}

#[tokio::test]
async fn test_tick_covers_all_three_passes() {
    use labreserve_entity::violation::Severity;

    let app = TestApp::new();
    let pc1 = app.add_resource("PC01", "10.0.0.1").await;
    let pc2 = app.add_resource("PC02", "10.0.0.2").await;

    // An overdue session on PC01.
    let overdue_ticket = app
        .ledger
        .request_reservation(&student(), pc1.id, 30)
        .await
        .unwrap();
    app.ledger.approve(&staff(), overdue_ticket.reservation_id).await.unwrap();
    let mut overdue = app
        .ledger
        .get_reservation(overdue_ticket.reservation_id)
        .await
        .unwrap();
    overdue.end_time = Some(Utc::now() - Duration::minutes(1));
    app.reservations.update(&overdue).await.unwrap();

    // A session on PC02 entering the warning window.
    let warn_ticket = app
        .ledger
        .request_reservation(&student(), pc2.id, 30)
        .await
        .unwrap();
    app.ledger.approve(&staff(), warn_ticket.reservation_id).await.unwrap();
    let mut warnable = app.ledger.get_reservation(warn_ticket.reservation_id).await.unwrap();
    warnable.end_time = Some(Utc::now() + Duration::minutes(5));
    app.reservations.update(&warnable).await.unwrap();

    // A lapsed moderate suspension.
    let suspended = student();
    app.suspensions
        .record_violation(&staff(), suspended.requester_id, None, Severity::Moderate, "mess")
        .await
        .unwrap();

    // First tick: the PC02 session sits inside the warning window.
    app.sweep.tick(Utc::now()).await;
    let warned = app.ledger.get_reservation(warn_ticket.reservation_id).await.unwrap();
    assert!(warned.warned_at.is_some());

    // A later tick, past the suspension's lift time, expires and
    // reinstates.
    app.sweep.tick(Utc::now() + Duration::days(4)).await;

    let expired = app
        .ledger
        .get_reservation(overdue_ticket.reservation_id)
        .await
        .unwrap();
    assert_eq!(expired.status, ReservationStatus::Completed);
    assert!(!app.suspensions.is_blocked(suspended.requester_id).await.unwrap());
}
