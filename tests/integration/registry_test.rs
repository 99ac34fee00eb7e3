//! Resource registry tests.

use futures::future::join_all;

use labreserve_core::error::ErrorKind;

use crate::helpers::{TestApp, staff, student};

#[tokio::test]
async fn test_remove_fails_while_a_reservation_is_live() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;
    app.ledger
        .request_reservation(&student(), pc.id, 30)
        .await
        .unwrap();

    let err = app.registry.remove(&staff(), pc.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ResourceInUse);
    assert_eq!(app.registry.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_remove_waits_for_an_in_flight_claim() {
    let app = TestApp::new();
    let pc = app.add_resource("PC01", "10.0.0.1").await;

    // Hold the resource lock the way a reservation request in progress
    // does; removal must queue behind it rather than racing the check.
    let guard = app.locks.resources.acquire(pc.id).await;
    let registry = app.registry.clone();
    let id = pc.id;
    let removal = tokio::spawn(async move { registry.remove(&staff(), id).await });
    tokio::task::yield_now().await;
    assert!(!removal.is_finished());

    drop(guard);
    removal.await.unwrap().unwrap();
    assert!(app.registry.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_registration_has_a_single_winner() {
    let app = TestApp::new();

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let registry = app.registry.clone();
            tokio::spawn(async move {
                registry
                    .register(&staff(), "PC01", format!("10.0.0.{}", i + 1).parse().unwrap())
                    .await
            })
        })
        .collect();

    let results = join_all(tasks).await;
    let successes = results
        .iter()
        .filter(|r| r.as_ref().unwrap().is_ok())
        .count();
    assert_eq!(successes, 1);
    for result in results {
        if let Err(e) = result.unwrap() {
            assert_eq!(e.kind, ErrorKind::DuplicateResource);
        }
    }
    assert_eq!(app.registry.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_address_is_rejected() {
    let app = TestApp::new();
    app.add_resource("PC01", "10.0.0.1").await;

    let err = app
        .registry
        .register(&staff(), "PC02", "10.0.0.1".parse().unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateResource);
}
