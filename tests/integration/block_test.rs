//! Block reservation allocator tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use labreserve_core::config::reservation::ReservationConfig;
use labreserve_core::error::ErrorKind;
use labreserve_core::traits::notifier::{BlockNotifier, TracingBlockNotifier};
use labreserve_core::{AppError, AppResult};
use labreserve_database::memory::{
    MemoryBlockStore, MemoryReservationStore, MemoryResourceStore,
};
use labreserve_database::{ReservationStore, ResourceStore};
use labreserve_entity::block::{BlockGroup, BlockStatus};
use labreserve_entity::reservation::{Reservation, ReservationStatus};
use labreserve_entity::resource::{Occupancy, Resource};
use labreserve_realtime::NotificationBus;
use labreserve_service::{BlockService, ReservationLocks};

use crate::helpers::{TestApp, faculty, staff, student};

fn cs101() -> BlockGroup {
    BlockGroup {
        college: "Engineering".into(),
        course: "CS101".into(),
        block: "B1".into(),
    }
}

#[tokio::test]
async fn test_students_cannot_request_blocks() {
    let app = TestApp::new();
    let err = app
        .blocks
        .request_block(&student(), cs101(), 2, None, None, vec![], None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_insufficient_resources_is_a_hard_rejection() {
    // Scenario: five requested, three available. Nothing is mutated.
    let app = TestApp::new();
    for i in 1..=3 {
        app.add_resource(&format!("PC0{i}"), &format!("10.0.0.{i}")).await;
    }

    let err = app
        .blocks
        .request_block(&faculty(), cs101(), 5, None, None, vec![], None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InsufficientResources);

    for resource in app.resources.list_all().await.unwrap() {
        assert_eq!(resource.occupancy, Occupancy::Available);
    }
}

#[tokio::test]
async fn test_approval_claims_in_display_order_and_spawns_children() {
    let app = TestApp::new();
    // Registered out of order; the claim follows the numeric sort key.
    app.add_resource("PC012", "10.0.0.12").await;
    app.add_resource("PC07", "10.0.0.7").await;
    app.add_resource("PC02", "10.0.0.2").await;

    let requester = faculty();
    let block = app
        .blocks
        .request_block(
            &requester,
            cs101(),
            2,
            None,
            None,
            vec!["cs101@example.edu".into()],
            None,
        )
        .await
        .unwrap();
    assert_eq!(block.status, BlockStatus::Pending);

    let approved = app.blocks.approve_block(&staff(), block.id).await.unwrap();
    assert_eq!(approved.status, BlockStatus::Confirmed);

    let children = app.blocks.children(block.id).await.unwrap();
    assert_eq!(children.len(), 2);
    let mut claimed_names: Vec<String> = Vec::new();
    for child in &children {
        assert_eq!(child.status, ReservationStatus::Confirmed);
        assert!(child.start_time.is_some());
        // Default block duration applies when the window is open-ended.
        let minutes = (child.end_time.unwrap() - child.start_time.unwrap()).num_minutes();
        assert_eq!(minutes, 120);
        let resource = app
            .resources
            .find_by_id(child.resource_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resource.occupancy, Occupancy::Occupied);
        claimed_names.push(resource.name);
    }
    claimed_names.sort();
    assert_eq!(claimed_names, vec!["PC02", "PC07"]);
}

#[tokio::test]
async fn test_one_active_block_per_requester() {
    let app = TestApp::new();
    for i in 1..=4 {
        app.add_resource(&format!("PC0{i}"), &format!("10.0.0.{i}")).await;
    }
    let requester = faculty();
    app.blocks
        .request_block(&requester, cs101(), 2, None, None, vec![], None)
        .await
        .unwrap();

    let err = app
        .blocks
        .request_block(&requester, cs101(), 1, None, None, vec![], None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RequesterHasActiveBlock);
}

#[tokio::test]
async fn test_decline_leaves_resources_untouched() {
    let app = TestApp::new();
    app.add_resource("PC01", "10.0.0.1").await;
    app.add_resource("PC02", "10.0.0.2").await;

    let block = app
        .blocks
        .request_block(&faculty(), cs101(), 2, None, None, vec![], None)
        .await
        .unwrap();
    let declined = app.blocks.decline_block(&staff(), block.id).await.unwrap();
    assert_eq!(declined.status, BlockStatus::Cancelled);

    assert!(app.blocks.children(block.id).await.unwrap().is_empty());
    for resource in app.resources.list_all().await.unwrap() {
        assert_eq!(resource.occupancy, Occupancy::Available);
    }
}

#[tokio::test]
async fn test_approval_shortfall_rolls_back_every_claim() {
    let app = TestApp::new();
    app.add_resource("PC01", "10.0.0.1").await;
    let pc2 = app.add_resource("PC02", "10.0.0.2").await;
    app.add_resource("PC03", "10.0.0.3").await;

    let block = app
        .blocks
        .request_block(&faculty(), cs101(), 3, None, None, vec![], None)
        .await
        .unwrap();

    // A single reservation slips in before approval, leaving only two
    // claimable resources.
    app.ledger
        .request_reservation(&student(), pc2.id, 30)
        .await
        .unwrap();

    let err = app.blocks.approve_block(&staff(), block.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InsufficientResources);

    // No partial grant: the two claimed resources were released again.
    assert!(app.blocks.children(block.id).await.unwrap().is_empty());
    for resource in app.resources.list_all().await.unwrap() {
        if resource.id != pc2.id {
            assert_eq!(resource.occupancy, Occupancy::Available);
        }
    }
}

/// Reservation store whose nth insert fails, for exercising write
/// failures mid-approval.
#[derive(Debug)]
struct FailingInsertStore {
    inner: MemoryReservationStore,
    failing_insert: usize,
    inserts: AtomicUsize,
}

impl FailingInsertStore {
    fn new(failing_insert: usize) -> Self {
        Self {
            inner: MemoryReservationStore::new(),
            failing_insert,
            inserts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ReservationStore for FailingInsertStore {
    async fn insert(&self, reservation: &Reservation) -> AppResult<()> {
        if self.inserts.fetch_add(1, Ordering::SeqCst) + 1 == self.failing_insert {
            return Err(AppError::internal("write failed"));
        }
        self.inner.insert(reservation).await
    }

    async fn update(&self, reservation: &Reservation) -> AppResult<()> {
        self.inner.update(reservation).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        self.inner.find_by_id(id).await
    }

    async fn find_live_by_resource(&self, resource_id: Uuid) -> AppResult<Option<Reservation>> {
        self.inner.find_live_by_resource(resource_id).await
    }

    async fn find_live_by_requester(&self, requester_id: Uuid) -> AppResult<Vec<Reservation>> {
        self.inner.find_live_by_requester(requester_id).await
    }

    async fn find_due_for_expiry(&self, now: DateTime<Utc>) -> AppResult<Vec<Reservation>> {
        self.inner.find_due_for_expiry(now).await
    }

    async fn find_in_warning_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Reservation>> {
        self.inner.find_in_warning_window(from, to).await
    }

    async fn find_by_block(&self, block_id: Uuid) -> AppResult<Vec<Reservation>> {
        self.inner.find_by_block(block_id).await
    }
}

#[tokio::test]
async fn test_failed_child_write_releases_every_claim() {
    let resources = Arc::new(MemoryResourceStore::new());
    // The first child lands, the second write fails.
    let reservations = Arc::new(FailingInsertStore::new(2));
    let service = BlockService::new(
        resources.clone(),
        reservations.clone(),
        Arc::new(MemoryBlockStore::new()),
        Arc::new(NotificationBus::new(64)),
        Arc::new(TracingBlockNotifier) as Arc<dyn BlockNotifier>,
        Arc::new(ReservationLocks::new()),
        ReservationConfig::default(),
    );
    for i in 1..=2 {
        let pc = Resource::new(&format!("PC0{i}"), format!("10.0.0.{i}").parse().unwrap());
        resources.insert(&pc).await.unwrap();
    }

    let block = service
        .request_block(&faculty(), cs101(), 2, None, None, vec![], None)
        .await
        .unwrap();
    let err = service.approve_block(&staff(), block.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);

    // The approval left nothing behind: the block is still pending, the
    // first child was cancelled, and both claims were released.
    assert_eq!(service.get(block.id).await.unwrap().status, BlockStatus::Pending);
    let children = service.children(block.id).await.unwrap();
    assert!(children.iter().all(|c| !c.is_live()));
    for resource in resources.list_all().await.unwrap() {
        assert_eq!(resource.occupancy, Occupancy::Available);
        assert!(
            reservations
                .find_live_by_resource(resource.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
