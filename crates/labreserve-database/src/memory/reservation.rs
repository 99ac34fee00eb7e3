//! In-memory reservation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use labreserve_core::result::AppResult;
use labreserve_entity::reservation::{Reservation, ReservationStatus};

use crate::stores::ReservationStore;

/// Reservation store backed by a `DashMap`.
#[derive(Debug, Default)]
pub struct MemoryReservationStore {
    reservations: DashMap<Uuid, Reservation>,
}

impl MemoryReservationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_sorted<F>(&self, filter: F) -> Vec<Reservation>
    where
        F: Fn(&Reservation) -> bool,
    {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| filter(r))
            .map(|r| r.clone())
            .collect();
        found.sort_by_key(|r| r.created_at);
        found
    }
}

#[async_trait]
impl ReservationStore for MemoryReservationStore {
    async fn insert(&self, reservation: &Reservation) -> AppResult<()> {
        self.reservations
            .insert(reservation.id, reservation.clone());
        Ok(())
    }

    async fn update(&self, reservation: &Reservation) -> AppResult<()> {
        let mut updated = reservation.clone();
        updated.updated_at = Utc::now();
        self.reservations.insert(updated.id, updated);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn find_live_by_resource(&self, resource_id: Uuid) -> AppResult<Option<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .find(|r| r.resource_id == resource_id && r.is_live())
            .map(|r| r.clone()))
    }

    async fn find_live_by_requester(&self, requester_id: Uuid) -> AppResult<Vec<Reservation>> {
        let mut found = self.collect_sorted(|r| r.requester_id == requester_id && r.is_live());
        found.reverse();
        Ok(found)
    }

    async fn find_due_for_expiry(&self, now: DateTime<Utc>) -> AppResult<Vec<Reservation>> {
        Ok(self.collect_sorted(|r| {
            r.status == ReservationStatus::Confirmed
                && r.expired_at.is_none()
                && r.end_time.is_some_and(|end| end <= now)
        }))
    }

    async fn find_in_warning_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Reservation>> {
        Ok(self.collect_sorted(|r| {
            r.status == ReservationStatus::Confirmed
                && r.warned_at.is_none()
                && r.expired_at.is_none()
                && r.end_time.is_some_and(|end| end >= from && end <= to)
        }))
    }

    async fn find_by_block(&self, block_id: Uuid) -> AppResult<Vec<Reservation>> {
        Ok(self.collect_sorted(|r| r.block_id == Some(block_id)))
    }
}
