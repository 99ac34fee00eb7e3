//! Reservation lifecycle tests.

use chrono::{Duration, Utc};
use futures::future::join_all;

use labreserve_core::error::ErrorKind;
use labreserve_database::{ReservationStore, ResourceStore};
use labreserve_entity::reservation::ReservationStatus;
use labreserve_entity::resource::Occupancy;

use crate::helpers::{TestApp, staff, student};

#[tokio::test]
async fn test_full_lifecycle_request_approve_expire() {
    // Scenario: available resource, requested, approved, swept after the
    // session runs out.
    let app = TestApp::new();
    let pc = app.add_resource("PC03", "10.0.0.3").await;
    let requester = student();

    let ticket = app
        .ledger
        .request_reservation(&requester, pc.id, 30)
        .await
        .unwrap();
    assert!(ticket.access_url.contains(&ticket.reservation_id.to_string()));

    let reservation = app.ledger.get_reservation(ticket.reservation_id).await.unwrap();
    assert_eq!(reservation.status, ReservationStatus::Pending);
    let pc_state = app.resources.find_by_id(pc.id).await.unwrap().unwrap();
    assert_eq!(pc_state.occupancy, Occupancy::Queued);

    let approved = app.ledger.approve(&staff(), ticket.reservation_id).await.unwrap();
    assert_eq!(approved.status, ReservationStatus::Confirmed);
    let start = approved.start_time.unwrap();
    assert_eq!(approved.end_time.unwrap(), start + Duration::minutes(30));
    let pc_state = app.resources.find_by_id(pc.id).await.unwrap().unwrap();
    assert_eq!(pc_state.occupancy, Occupancy::Occupied);

    // Sweep after the end time has passed.
    let after_end = approved.end_time.unwrap() + Duration::seconds(1);
    app.sweep.tick(after_end).await;

    let completed = app.ledger.get_reservation(ticket.reservation_id).await.unwrap();
    assert_eq!(completed.status, ReservationStatus::Completed);
    assert!(completed.expired_at.is_some());
    let pc_state = app.resources.find_by_id(pc.id).await.unwrap().unwrap();
    assert_eq!(pc_state.occupancy, Occupancy::Available);
}

#[tokio::test]
async fn test_decline_releases_resource() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    let ticket = app
        .ledger
        .request_reservation(&student(), pc.id, 30)
        .await
        .unwrap();

    let declined = app.ledger.decline(&staff(), ticket.reservation_id).await.unwrap();
    assert_eq!(declined.status, ReservationStatus::Cancelled);
    let pc_state = app.resources.find_by_id(pc.id).await.unwrap().unwrap();
    assert_eq!(pc_state.occupancy, Occupancy::Available);

    // Terminal state: approving afterwards is an illegal transition.
    let err = app
        .ledger
        .approve(&staff(), ticket.reservation_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);
}

#[tokio::test]
async fn test_end_early_owner_and_stranger() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    let owner = student();
    let ticket = app
        .ledger
        .request_reservation(&owner, pc.id, 30)
        .await
        .unwrap();
    app.ledger.approve(&staff(), ticket.reservation_id).await.unwrap();

    let err = app
        .ledger
        .end_early(&student(), ticket.reservation_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let ended = app.ledger.end_early(&owner, ticket.reservation_id).await.unwrap();
    assert_eq!(ended.status, ReservationStatus::Completed);
    let pc_state = app.resources.find_by_id(pc.id).await.unwrap().unwrap();
    assert_eq!(pc_state.occupancy, Occupancy::Available);
}

#[tokio::test]
async fn test_auto_approve_via_token_is_idempotent() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    let ticket = app
        .ledger
        .request_reservation(&student(), pc.id, 45)
        .await
        .unwrap();

    let first = app
        .ledger
        .auto_approve_via_token(ticket.reservation_id)
        .await
        .unwrap();
    assert_eq!(first.status, ReservationStatus::Confirmed);

    // Re-presenting the token is a no-op, not an error.
    let second = app
        .ledger
        .auto_approve_via_token(ticket.reservation_id)
        .await
        .unwrap();
    assert_eq!(second.end_time, first.end_time);

    // But a terminal reservation rejects the token.
    app.ledger
        .end_early(&staff(), ticket.reservation_id)
        .await
        .unwrap();
    let err = app
        .ledger
        .auto_approve_via_token(ticket.reservation_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);
}

#[tokio::test]
async fn test_requester_cannot_hold_two_reservations() {
    let app = TestApp::new();
    let pc1 = app.add_resource("PC01", "10.0.0.1").await;
    let pc2 = app.add_resource("PC02", "10.0.0.2").await;
    let requester = student();

    let ticket = app
        .ledger
        .request_reservation(&requester, pc1.id, 30)
        .await
        .unwrap();
    let err = app
        .ledger
        .request_reservation(&requester, pc2.id, 30)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RequesterHasActiveReservation);

    // After the first completes, a new request succeeds.
    app.ledger.decline(&staff(), ticket.reservation_id).await.unwrap();
    app.ledger
        .request_reservation(&requester, pc2.id, 30)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unavailable_resource_is_rejected() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    app.ledger
        .request_reservation(&student(), pc.id, 30)
        .await
        .unwrap();

    let err = app
        .ledger
        .request_reservation(&student(), pc.id, 30)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ResourceUnavailable);
}

#[tokio::test]
async fn test_overdue_session_is_expired_inline_on_request() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    let first = student();
    let ticket = app
        .ledger
        .request_reservation(&first, pc.id, 30)
        .await
        .unwrap();
    app.ledger.approve(&staff(), ticket.reservation_id).await.unwrap();

    // Force the session into the past without sweeping.
    let mut overdue = app.ledger.get_reservation(ticket.reservation_id).await.unwrap();
    overdue.end_time = Some(Utc::now() - Duration::minutes(1));
    app.reservations.update(&overdue).await.unwrap();

    // A new request finds the stale session, expires it, and claims the
    // resource.
    let second = student();
    app.ledger
        .request_reservation(&second, pc.id, 30)
        .await
        .unwrap();

    let expired = app.ledger.get_reservation(ticket.reservation_id).await.unwrap();
    assert_eq!(expired.status, ReservationStatus::Completed);
    assert!(expired.expired_at.is_some());
}

#[tokio::test]
async fn test_concurrent_requests_yield_exactly_one_success() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;

    let attempts = (0..16).map(|_| {
        let ledger = app.ledger.clone();
        let ctx = student();
        let resource_id = pc.id;
        tokio::spawn(async move { ledger.request_reservation(&ctx, resource_id, 30).await })
    });
    let outcomes = join_all(attempts).await;

    let mut successes = 0;
    for outcome in outcomes {
        match outcome.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert!(matches!(
                e.kind,
                ErrorKind::ResourceUnavailable | ErrorKind::RequesterHasActiveReservation
            )),
        }
    }
    assert_eq!(successes, 1);

    // The per-resource invariant holds: one live reservation.
    let live = app.reservations.find_live_by_resource(pc.id).await.unwrap();
    assert!(live.is_some());
}
