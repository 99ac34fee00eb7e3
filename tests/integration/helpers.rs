//! Shared test helpers for integration tests.

use std::net::IpAddr;
use std::sync::Arc;

use uuid::Uuid;

use labreserve_core::config::reservation::ReservationConfig;
use labreserve_core::config::suspension::SuspensionConfig;
use labreserve_core::config::sweep::SweepConfig;
use labreserve_core::traits::notifier::{BlockNotifier, TracingBlockNotifier};
use labreserve_database::memory::{
    MemoryBlockStore, MemoryReservationStore, MemoryResourceStore, MemoryViolationStore,
};
use labreserve_database::{BlockStore, ReservationStore, ResourceStore, ViolationStore};
use labreserve_entity::requester::Role;
use labreserve_entity::resource::Resource;
use labreserve_realtime::NotificationBus;
use labreserve_service::{
    BlockService, LedgerService, RegistryService, RequestContext, ReservationLocks,
    SuspensionService,
};
use labreserve_worker::Sweep;

/// Everything a test needs: the services plus direct store handles for
/// fixture setup and assertions.
pub struct TestApp {
    pub registry: Arc<RegistryService>,
    pub ledger: Arc<LedgerService>,
    pub blocks: Arc<BlockService>,
    pub suspensions: Arc<SuspensionService>,
    pub sweep: Sweep,
    pub bus: Arc<NotificationBus>,
    pub locks: Arc<ReservationLocks>,
    pub resources: Arc<MemoryResourceStore>,
    pub reservations: Arc<MemoryReservationStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let resources = Arc::new(MemoryResourceStore::new());
        let reservations = Arc::new(MemoryReservationStore::new());
        let blocks_store = Arc::new(MemoryBlockStore::new());
        let violations = Arc::new(MemoryViolationStore::new());

        let resources_dyn: Arc<dyn ResourceStore> = resources.clone();
        let reservations_dyn: Arc<dyn ReservationStore> = reservations.clone();
        let blocks_dyn: Arc<dyn BlockStore> = blocks_store;
        let violations_dyn: Arc<dyn ViolationStore> = violations;

        let bus = Arc::new(NotificationBus::new(64));
        let locks = Arc::new(ReservationLocks::new());
        let notifier: Arc<dyn BlockNotifier> = Arc::new(TracingBlockNotifier);
        let reservation_config = ReservationConfig::default();

        let registry = Arc::new(RegistryService::new(
            resources_dyn.clone(),
            reservations_dyn.clone(),
            bus.clone(),
            locks.clone(),
        ));
        let suspensions = Arc::new(SuspensionService::new(
            violations_dyn,
            bus.clone(),
            SuspensionConfig::default(),
        ));
        let ledger = Arc::new(LedgerService::new(
            resources_dyn.clone(),
            reservations_dyn.clone(),
            suspensions.clone(),
            bus.clone(),
            locks.clone(),
            reservation_config.clone(),
        ));
        let blocks = Arc::new(BlockService::new(
            resources_dyn,
            reservations_dyn,
            blocks_dyn,
            bus.clone(),
            notifier,
            locks.clone(),
            reservation_config,
        ));
        let sweep = Sweep::new(ledger.clone(), suspensions.clone(), SweepConfig::default());

        Self {
            registry,
            ledger,
            blocks,
            suspensions,
            sweep,
            bus,
            locks,
            resources,
            reservations,
        }
    }

    /// Registers a resource as staff and returns it.
    pub async fn add_resource(&self, name: &str, address: &str) -> Resource {
        let addr: IpAddr = address.parse().expect("valid test address");
        self.registry
            .register(&staff(), name, addr)
            .await
            .expect("resource registration")
    }
}

pub fn student() -> RequestContext {
    RequestContext::new(Uuid::new_v4(), Role::Student)
}

pub fn faculty() -> RequestContext {
    RequestContext::new(Uuid::new_v4(), Role::Faculty)
}

pub fn staff() -> RequestContext {
    RequestContext::new(Uuid::new_v4(), Role::Staff)
}
