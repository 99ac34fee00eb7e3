//! Store traits consumed by the services as trait objects.
//!
//! Every store operates on whole entities; compound check-then-write
//! sequences are serialized by the services' per-id locks, so the stores
//! themselves only need per-row atomicity.

use std::net::IpAddr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use labreserve_core::AppResult;
use labreserve_entity::block::BlockReservation;
use labreserve_entity::reservation::Reservation;
use labreserve_entity::resource::{Condition, Connectivity, Occupancy, Resource};
use labreserve_entity::violation::Violation;

/// Persistence for the resource registry.
#[async_trait]
pub trait ResourceStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a newly registered resource.
    async fn insert(&self, resource: &Resource) -> AppResult<()>;

    /// Find a resource by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Resource>>;

    /// Find a resource by its unique name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Resource>>;

    /// Find a resource by its unique network address.
    async fn find_by_address(&self, address: IpAddr) -> AppResult<Option<Resource>>;

    /// All resources in display order.
    async fn list_all(&self) -> AppResult<Vec<Resource>>;

    /// Resources that are connected, active, and available, in display
    /// order (sort key, then name).
    async fn list_available(&self) -> AppResult<Vec<Resource>>;

    /// Number of resources currently available for booking.
    async fn count_available(&self) -> AppResult<u64>;

    /// Set the occupancy axis. Only the ledger, allocator, and sweep call
    /// this.
    async fn set_occupancy(&self, id: Uuid, occupancy: Occupancy) -> AppResult<()>;

    /// Set the condition axis.
    async fn set_condition(&self, id: Uuid, condition: Condition) -> AppResult<()>;

    /// Set the connectivity axis.
    async fn set_connectivity(&self, id: Uuid, connectivity: Connectivity) -> AppResult<()>;

    /// Delete a resource. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Persistence for the reservation ledger.
#[async_trait]
pub trait ReservationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Append a new reservation.
    async fn insert(&self, reservation: &Reservation) -> AppResult<()>;

    /// Persist a mutated reservation.
    async fn update(&self, reservation: &Reservation) -> AppResult<()>;

    /// Find a reservation by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>>;

    /// The resource's current live (pending or confirmed) reservation.
    /// The per-resource invariant guarantees at most one exists.
    async fn find_live_by_resource(&self, resource_id: Uuid) -> AppResult<Option<Reservation>>;

    /// All live reservations owned by a requester.
    async fn find_live_by_requester(&self, requester_id: Uuid) -> AppResult<Vec<Reservation>>;

    /// Confirmed reservations whose sessions ran out and that the expiry
    /// pass has not yet processed.
    async fn find_due_for_expiry(&self, now: DateTime<Utc>) -> AppResult<Vec<Reservation>>;

    /// Confirmed, not-yet-warned reservations whose `end_time` falls in
    /// `[from, to]`.
    async fn find_in_warning_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Reservation>>;

    /// Children spawned by a block approval.
    async fn find_by_block(&self, block_id: Uuid) -> AppResult<Vec<Reservation>>;
}

/// Persistence for block reservations.
#[async_trait]
pub trait BlockStore: Send + Sync + std::fmt::Debug + 'static {
    /// Append a new block reservation.
    async fn insert(&self, block: &BlockReservation) -> AppResult<()>;

    /// Persist a mutated block reservation.
    async fn update(&self, block: &BlockReservation) -> AppResult<()>;

    /// Find a block reservation by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BlockReservation>>;

    /// The requester's current live (pending or confirmed) block, if any.
    async fn find_live_by_requester(
        &self,
        requester_id: Uuid,
    ) -> AppResult<Option<BlockReservation>>;
}

/// Persistence for violations.
#[async_trait]
pub trait ViolationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Append a new violation.
    async fn insert(&self, violation: &Violation) -> AppResult<()>;

    /// Persist a mutated violation.
    async fn update(&self, violation: &Violation) -> AppResult<()>;

    /// Find a violation by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Violation>>;

    /// The requester's most recent unresolved violation, if any.
    async fn find_latest_unresolved(&self, requester_id: Uuid) -> AppResult<Option<Violation>>;

    /// All violations for a requester, newest first.
    async fn find_by_requester(&self, requester_id: Uuid) -> AppResult<Vec<Violation>>;

    /// Moderate, suspended, unresolved violations whose lift time has
    /// passed.
    async fn find_auto_releasable(&self, now: DateTime<Utc>) -> AppResult<Vec<Violation>>;
}
