//! Suspension policy tests.

use chrono::{Duration, Utc};

use labreserve_core::error::ErrorKind;
use labreserve_entity::violation::{Severity, ViolationStatus};

use crate::helpers::{TestApp, staff, student};

#[tokio::test]
async fn test_minor_violation_does_not_block_booking() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    let requester = student();

    let violation = app
        .suspensions
        .record_violation(&staff(), requester.requester_id, None, Severity::Minor, "late return")
        .await
        .unwrap();
    assert_eq!(violation.status, ViolationStatus::Active);
    assert!(!app.suspensions.is_blocked(requester.requester_id).await.unwrap());

    app.ledger
        .request_reservation(&requester, pc.id, 30)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_moderate_suspension_blocks_until_swept() {
    // Scenario: a moderate suspension whose lift time has passed is
    // cleared by the sweep, after which booking succeeds.
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    let requester = student();

    let violation = app
        .suspensions
        .record_violation(
            &staff(),
            requester.requester_id,
            Some(pc.id),
            Severity::Moderate,
            "left station in disarray",
        )
        .await
        .unwrap();
    assert!(violation.suspension_end_at.is_some());

    let err = app
        .ledger
        .request_reservation(&requester, pc.id, 30)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RequesterSuspended);

    // Tick before the lift time: still blocked.
    app.sweep.tick(Utc::now()).await;
    assert!(app.suspensions.is_blocked(requester.requester_id).await.unwrap());

    // Tick after the lift time: reinstated.
    let after_lift = violation.suspension_end_at.unwrap() + Duration::seconds(1);
    app.sweep.tick(after_lift).await;
    assert!(!app.suspensions.is_blocked(requester.requester_id).await.unwrap());

    app.ledger
        .request_reservation(&requester, pc.id, 30)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_major_suspension_requires_manual_release() {
    // Scenario: a major violation is never auto-released, no matter how
    // often the timed pass runs.
    let app = TestApp::new();
    let requester = student();

    let violation = app
        .suspensions
        .record_violation(&staff(), requester.requester_id, None, Severity::Major, "theft")
        .await
        .unwrap();
    assert!(violation.suspension_end_at.is_none());

    for _ in 0..3 {
        let released = app
            .suspensions
            .auto_release_expired(Utc::now() + Duration::days(365))
            .await
            .unwrap();
        assert_eq!(released, 0);
    }
    assert!(app.suspensions.is_blocked(requester.requester_id).await.unwrap());

    let released = app
        .suspensions
        .manual_release(&staff(), violation.id)
        .await
        .unwrap();
    assert!(released.resolved);
    assert!(released.slip_reviewed);
    assert!(!app.suspensions.is_blocked(requester.requester_id).await.unwrap());
}

#[tokio::test]
async fn test_release_is_not_repeatable() {
    let app = TestApp::new();
    let requester = student();
    let violation = app
        .suspensions
        .record_violation(&staff(), requester.requester_id, None, Severity::Major, "theft")
        .await
        .unwrap();

    app.suspensions.manual_release(&staff(), violation.id).await.unwrap();
    let err = app
        .suspensions
        .manual_release(&staff(), violation.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);
}

#[tokio::test]
async fn test_only_staff_record_and_release() {
    let app = TestApp::new();
    let requester = student();

    let err = app
        .suspensions
        .record_violation(&student(), requester.requester_id, None, Severity::Minor, "x")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let violation = app
        .suspensions
        .record_violation(&staff(), requester.requester_id, None, Severity::Major, "theft")
        .await
        .unwrap();
    let err = app
        .suspensions
        .manual_release(&student(), violation.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}
