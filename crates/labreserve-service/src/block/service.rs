//! Block reservation allocator service.
//!
//! A block claims N resources atomically for one requester. No
//! resources are held while the block is pending; the claim happens at
//! approval, and a shortfall mid-claim rolls every claimed resource
//! back. There is no partial grant.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use labreserve_core::AppError;
use labreserve_core::config::reservation::ReservationConfig;
use labreserve_core::events::{BlockEvent, EventPayload, Notification};
use labreserve_core::traits::notifier::BlockNotifier;
use labreserve_core::types::Topic;
use labreserve_database::{BlockStore, ReservationStore, ResourceStore};
use labreserve_entity::block::{BlockGroup, BlockReservation, BlockStatus};
use labreserve_entity::reservation::{Reservation, ReservationStatus};
use labreserve_entity::resource::{Occupancy, Resource};
use labreserve_realtime::NotificationBus;

use crate::context::RequestContext;
use crate::locks::ReservationLocks;
use crate::publish;

/// Allocates blocks of resources for faculty groups.
#[derive(Debug, Clone)]
pub struct BlockService {
    resources: Arc<dyn ResourceStore>,
    reservations: Arc<dyn ReservationStore>,
    blocks: Arc<dyn BlockStore>,
    bus: Arc<NotificationBus>,
    notifier: Arc<dyn BlockNotifier>,
    locks: Arc<ReservationLocks>,
    config: ReservationConfig,
}

impl BlockService {
    /// Creates a new block allocator.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        reservations: Arc<dyn ReservationStore>,
        blocks: Arc<dyn BlockStore>,
        bus: Arc<NotificationBus>,
        notifier: Arc<dyn BlockNotifier>,
        locks: Arc<ReservationLocks>,
        config: ReservationConfig,
    ) -> Self {
        Self {
            resources,
            reservations,
            blocks,
            bus,
            notifier,
            locks,
            config,
        }
    }

    /// Submits a block reservation for a group (faculty or staff).
    #[allow(clippy::too_many_arguments)]
    pub async fn request_block(
        &self,
        ctx: &RequestContext,
        group: BlockGroup,
        count: i32,
        window_start: Option<DateTime<Utc>>,
        window_end: Option<DateTime<Utc>>,
        notify_addresses: Vec<String>,
        attachment: Option<String>,
    ) -> Result<BlockReservation, AppError> {
        if !ctx.can_request_block() {
            return Err(AppError::authorization(
                "Only faculty or staff may request block reservations",
            ));
        }
        if count <= 0 {
            return Err(AppError::validation(
                "A block must request at least one resource",
            ));
        }

        let _requester_guard = self.locks.requesters.acquire(ctx.requester_id).await;

        if self
            .blocks
            .find_live_by_requester(ctx.requester_id)
            .await?
            .is_some()
        {
            return Err(AppError::active_block(
                "You already have a pending or confirmed block reservation",
            ));
        }

        let available = self.resources.count_available().await?;
        if available < count as u64 {
            return Err(AppError::insufficient_resources(format!(
                "Requested {count} resources but only {available} are available"
            )));
        }

        let block = BlockReservation::new(
            ctx.requester_id,
            group,
            count,
            window_start,
            window_end,
            notify_addresses,
            attachment,
        );
        self.blocks.insert(&block).await?;
        info!(
            block_id = %block.id,
            requester_id = %ctx.requester_id,
            count,
            "Block reservation requested"
        );

        self.bus.publish(Notification::new(
            Topic::StaffAlerts,
            EventPayload::Block(BlockEvent::Requested {
                block_id: block.id,
                requester_id: ctx.requester_id,
                requested_count: count as u32,
            }),
            block.status.as_str(),
            format!("New block request for {count} resources"),
        ));
        Ok(block)
    }

    /// Approves a pending block (staff): atomically claims the first N
    /// available resources in display order and spawns one confirmed
    /// child reservation per claimed resource.
    pub async fn approve_block(
        &self,
        ctx: &RequestContext,
        block_id: Uuid,
    ) -> Result<BlockReservation, AppError> {
        if !ctx.is_staff() {
            return Err(AppError::authorization("Only staff may approve blocks"));
        }
        let mut block = self.get(block_id).await?;
        if block.status != BlockStatus::Pending {
            warn!(
                block_id = %block_id,
                status = block.status.as_str(),
                "Block approval rejected: not pending"
            );
            return Err(AppError::invalid_transition(format!(
                "Cannot approve a {} block reservation",
                block.status.as_str()
            )));
        }

        let claimed = self.claim_resources(block.requested_count as usize).await?;

        let now = Utc::now();
        let minutes = block.session_minutes(self.config.default_block_duration_minutes);
        let resource_names = match self.spawn_children(&block, &claimed, now, minutes).await {
            Ok(names) => names,
            Err(e) => {
                warn!(
                    block_id = %block_id,
                    error = %e,
                    "Child reservation write failed; releasing claimed resources"
                );
                self.release_claimed(&claimed).await;
                return Err(e);
            }
        };

        block.status = BlockStatus::Confirmed;
        if block.window_start.is_none() {
            block.window_start = Some(now);
            block.window_end = Some(now + Duration::minutes(minutes));
        }
        self.blocks.update(&block).await?;
        info!(
            block_id = %block_id,
            resources = claimed.len(),
            minutes,
            "Block reservation approved"
        );

        let access_url = block.access_url(&self.config.access_url_base);
        self.bus.publish(Notification::new(
            Topic::Requester(block.requester_id),
            EventPayload::Block(BlockEvent::Approved {
                block_id: block.id,
                requester_id: block.requester_id,
                resource_names: resource_names.clone(),
                access_url: access_url.clone(),
            }),
            block.status.as_str(),
            format!(
                "Block approved: {} assigned",
                resource_names.join(", ")
            ),
        ));

        // Delivery is best-effort; a failed notice never rolls back the
        // approval.
        let body = format!(
            "Your block reservation for {} {} ({}) was approved.\n\
             Assigned resources: {}\nAccess: {access_url}",
            block.course,
            block.block,
            block.college,
            resource_names.join(", ")
        );
        if let Err(e) = self
            .notifier
            .notify(
                &block.notify_addresses,
                "Block reservation approved",
                &body,
                block.attachment.as_deref(),
            )
            .await
        {
            warn!(block_id = %block_id, error = %e, "Block-approval notice failed");
        }
        Ok(block)
    }

    /// Declines a pending block (staff). Nothing was held, so nothing is
    /// released.
    pub async fn decline_block(
        &self,
        ctx: &RequestContext,
        block_id: Uuid,
    ) -> Result<BlockReservation, AppError> {
        if !ctx.is_staff() {
            return Err(AppError::authorization("Only staff may decline blocks"));
        }
        let mut block = self.get(block_id).await?;
        if block.status != BlockStatus::Pending {
            return Err(AppError::invalid_transition(format!(
                "Cannot decline a {} block reservation",
                block.status.as_str()
            )));
        }

        block.status = BlockStatus::Cancelled;
        self.blocks.update(&block).await?;
        info!(block_id = %block_id, "Block reservation declined");

        self.bus.publish(Notification::new(
            Topic::Requester(block.requester_id),
            EventPayload::Block(BlockEvent::Declined {
                block_id: block.id,
                requester_id: block.requester_id,
            }),
            block.status.as_str(),
            "Your block reservation was declined",
        ));
        Ok(block)
    }

    /// Looks up a block reservation by id.
    pub async fn get(&self, id: Uuid) -> Result<BlockReservation, AppError> {
        self.blocks
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Block reservation not found"))
    }

    /// Child reservations spawned by a block approval.
    pub async fn children(&self, block_id: Uuid) -> Result<Vec<Reservation>, AppError> {
        self.reservations.find_by_block(block_id).await
    }

    /// Claims `count` available resources in display order, taking each
    /// resource's lock for its check-and-set. On shortfall, every
    /// already-claimed resource is released and the whole claim fails.
    async fn claim_resources(&self, count: usize) -> Result<Vec<Resource>, AppError> {
        let candidates = self.resources.list_available().await?;
        let mut claimed: Vec<Resource> = Vec::with_capacity(count);

        for candidate in candidates {
            if claimed.len() == count {
                break;
            }
            let _guard = self.locks.resources.acquire(candidate.id).await;
            let current = match self.resources.find_by_id(candidate.id).await? {
                Some(r) => r,
                None => continue,
            };
            if !current.is_bookable() {
                continue;
            }
            if self
                .reservations
                .find_live_by_resource(current.id)
                .await?
                .is_some()
            {
                continue;
            }
            self.set_occupancy(&current, Occupancy::Occupied).await?;
            claimed.push(current);
        }

        if claimed.len() < count {
            let shortfall = claimed.len();
            self.release_claimed(&claimed).await;
            return Err(AppError::insufficient_resources(format!(
                "Only {shortfall} of {count} requested resources could be claimed"
            )));
        }
        Ok(claimed)
    }

    /// Spawns one confirmed child reservation per claimed resource. If a
    /// write fails partway, the children already written are cancelled
    /// before the error surfaces.
    async fn spawn_children(
        &self,
        block: &BlockReservation,
        claimed: &[Resource],
        now: DateTime<Utc>,
        minutes: i64,
    ) -> Result<Vec<String>, AppError> {
        let mut spawned: Vec<Reservation> = Vec::with_capacity(claimed.len());
        let mut resource_names = Vec::with_capacity(claimed.len());
        for resource in claimed {
            let mut child = Reservation::new(resource.id, block.requester_id, minutes);
            child.status = ReservationStatus::Confirmed;
            child.start_time = Some(now);
            child.end_time = Some(now + Duration::minutes(minutes));
            child.block_id = Some(block.id);
            if let Err(e) = self.reservations.insert(&child).await {
                for mut earlier in spawned {
                    earlier.status = ReservationStatus::Cancelled;
                    earlier.end_time = Some(now);
                    if let Err(e) = self.reservations.update(&earlier).await {
                        warn!(
                            reservation_id = %earlier.id,
                            error = %e,
                            "Failed to cancel partially spawned child"
                        );
                    }
                }
                return Err(e);
            }
            spawned.push(child);
            resource_names.push(resource.name.clone());
        }
        Ok(resource_names)
    }

    /// Returns every claimed resource to `Available`. Used on any failure
    /// after the claim; release errors are logged rather than masking the
    /// failure that got us here.
    async fn release_claimed(&self, claimed: &[Resource]) {
        for resource in claimed {
            let _guard = self.locks.resources.acquire(resource.id).await;
            if let Err(e) = self.set_occupancy(resource, Occupancy::Available).await {
                warn!(
                    resource_id = %resource.id,
                    error = %e,
                    "Failed to release claimed resource"
                );
            }
        }
    }

    async fn set_occupancy(&self, resource: &Resource, occupancy: Occupancy) -> Result<(), AppError> {
        self.resources.set_occupancy(resource.id, occupancy).await?;
        let mut updated = resource.clone();
        updated.occupancy = occupancy;
        let available = self.resources.count_available().await?;
        publish::resource_status(&self.bus, &updated, available);
        Ok(())
    }
}
