//! Reservation ledger service: the core state machine.
//!
//! Legal transitions: `pending → confirmed → completed`,
//! `pending → cancelled`, `confirmed → cancelled`. Anything else is an
//! `InvalidTransition`.
//!
//! Every check-then-write runs inside the per-id locks: the requester
//! lock covers the active-reservation check plus the insert, the
//! resource lock covers the occupancy check-and-set. The requester lock
//! is always taken first.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use labreserve_core::AppError;
use labreserve_core::config::reservation::ReservationConfig;
use labreserve_core::events::{EventPayload, Notification, ReservationEvent};
use labreserve_core::types::Topic;
use labreserve_database::{ReservationStore, ResourceStore};
use labreserve_entity::reservation::{Reservation, ReservationStatus};
use labreserve_entity::resource::{Occupancy, Resource};
use labreserve_realtime::NotificationBus;

use crate::context::RequestContext;
use crate::locks::ReservationLocks;
use crate::publish;
use crate::suspension::SuspensionService;

/// What a successful reservation request hands back: the id and the
/// scannable access URL the requester presents at the resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationTicket {
    /// The new reservation's id.
    pub reservation_id: Uuid,
    /// Access URL embedding the id; its unguessability is the
    /// authorization for [`LedgerService::auto_approve_via_token`].
    pub access_url: String,
}

/// The append-mostly log of reservation requests and their lifecycle.
#[derive(Debug, Clone)]
pub struct LedgerService {
    resources: Arc<dyn ResourceStore>,
    reservations: Arc<dyn ReservationStore>,
    suspensions: Arc<SuspensionService>,
    bus: Arc<NotificationBus>,
    locks: Arc<ReservationLocks>,
    config: ReservationConfig,
}

impl LedgerService {
    /// Creates a new ledger service.
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        reservations: Arc<dyn ReservationStore>,
        suspensions: Arc<SuspensionService>,
        bus: Arc<NotificationBus>,
        locks: Arc<ReservationLocks>,
        config: ReservationConfig,
    ) -> Self {
        Self {
            resources,
            reservations,
            suspensions,
            bus,
            locks,
            config,
        }
    }

    /// Requests a reservation for a resource.
    ///
    /// Check order: suspension, then the requester's own active
    /// reservation, then the resource's availability; the final
    /// check-and-set creates the pending reservation and moves the
    /// resource to `queued` in one critical section.
    pub async fn request_reservation(
        &self,
        ctx: &RequestContext,
        resource_id: Uuid,
        duration_minutes: i64,
    ) -> Result<ReservationTicket, AppError> {
        if duration_minutes <= 0 {
            return Err(AppError::validation(
                "Session duration must be at least one minute",
            ));
        }

        if let Some(violation) = self.suspensions.blocking_violation(ctx.requester_id).await? {
            let message = match violation.suspension_end_at {
                Some(end) => format!(
                    "You are suspended until {}",
                    end.format("%Y-%m-%d %H:%M UTC")
                ),
                None => "You are suspended pending a staff review".to_string(),
            };
            return Err(AppError::requester_suspended(message));
        }

        let _requester_guard = self.locks.requesters.acquire(ctx.requester_id).await;

        let now = Utc::now();
        let live = self
            .reservations
            .find_live_by_requester(ctx.requester_id)
            .await?;
        let has_active = live
            .iter()
            .any(|r| r.end_time.is_none_or(|end| end > now));
        if has_active {
            return Err(AppError::active_reservation(
                "You already have a pending or running reservation",
            ));
        }

        let _resource_guard = self.locks.resources.acquire(resource_id).await;

        let resource = self.get_resource(resource_id).await?;

        // A session that ran out but has not been swept yet does not
        // block a new request; expire it through the sweep's own
        // idempotent path first.
        if let Some(current) = self.reservations.find_live_by_resource(resource_id).await? {
            if current.is_overdue(now) {
                self.expire_locked(current, now).await?;
            }
        }

        let resource = match self.resources.find_by_id(resource_id).await? {
            Some(r) => r,
            None => resource,
        };
        if !resource.is_bookable() {
            return Err(AppError::resource_unavailable(format!(
                "{} is not available for booking",
                resource.name
            )));
        }

        let reservation = Reservation::new(resource_id, ctx.requester_id, duration_minutes);
        self.reservations.insert(&reservation).await?;
        self.set_occupancy(&resource, Occupancy::Queued).await?;
        info!(
            reservation_id = %reservation.id,
            resource_id = %resource_id,
            requester_id = %ctx.requester_id,
            duration_minutes,
            "Reservation requested"
        );

        self.bus.publish(Notification::new(
            Topic::StaffAlerts,
            EventPayload::Reservation(ReservationEvent::Requested {
                reservation_id: reservation.id,
                resource_id,
                requester_id: ctx.requester_id,
                requested_minutes: duration_minutes,
            }),
            reservation.status.as_str(),
            format!("New reservation request for {}", resource.name),
        ));

        Ok(ReservationTicket {
            reservation_id: reservation.id,
            access_url: reservation.access_url(&self.config.access_url_base),
        })
    }

    /// Approves a pending reservation and starts the session (staff).
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        reservation_id: Uuid,
    ) -> Result<Reservation, AppError> {
        if !ctx.is_staff() {
            return Err(AppError::authorization(
                "Only staff may approve reservations",
            ));
        }
        self.confirm(reservation_id, false).await
    }

    /// Confirms a reservation via its access token, the requester having
    /// presented the access URL at the resource itself. Not role-gated;
    /// the token's unguessability is the control. Re-presenting an
    /// already-confirmed token is a no-op.
    pub async fn auto_approve_via_token(
        &self,
        reservation_id: Uuid,
    ) -> Result<Reservation, AppError> {
        self.confirm(reservation_id, true).await
    }

    /// Declines a pending reservation (staff).
    pub async fn decline(
        &self,
        ctx: &RequestContext,
        reservation_id: Uuid,
    ) -> Result<Reservation, AppError> {
        if !ctx.is_staff() {
            return Err(AppError::authorization(
                "Only staff may decline reservations",
            ));
        }
        let mut reservation = self.get_reservation(reservation_id).await?;
        let _guard = self.locks.resources.acquire(reservation.resource_id).await;
        reservation = self.get_reservation(reservation_id).await?;

        if reservation.status != ReservationStatus::Pending {
            warn!(
                reservation_id = %reservation_id,
                status = reservation.status.as_str(),
                "Decline rejected: reservation is not pending"
            );
            return Err(AppError::invalid_transition(format!(
                "Cannot decline a {} reservation",
                reservation.status
            )));
        }

        reservation.status = ReservationStatus::Cancelled;
        self.reservations.update(&reservation).await?;
        self.release_resource(reservation.resource_id).await?;
        info!(reservation_id = %reservation_id, "Reservation declined");

        self.bus.publish(Notification::new(
            Topic::Requester(reservation.requester_id),
            EventPayload::Reservation(ReservationEvent::Declined {
                reservation_id,
                resource_id: reservation.resource_id,
                requester_id: reservation.requester_id,
            }),
            reservation.status.as_str(),
            "Your reservation was declined",
        ));
        Ok(reservation)
    }

    /// Ends a running session before its end time. Allowed for staff and
    /// for the reservation's own requester.
    pub async fn end_early(
        &self,
        ctx: &RequestContext,
        reservation_id: Uuid,
    ) -> Result<Reservation, AppError> {
        let mut reservation = self.get_reservation(reservation_id).await?;
        if !ctx.is_staff() && ctx.requester_id != reservation.requester_id {
            return Err(AppError::authorization(
                "Only staff or the reservation's owner may end the session",
            ));
        }
        let _guard = self.locks.resources.acquire(reservation.resource_id).await;
        reservation = self.get_reservation(reservation_id).await?;

        if reservation.status != ReservationStatus::Confirmed {
            warn!(
                reservation_id = %reservation_id,
                status = reservation.status.as_str(),
                "Early end rejected: reservation is not confirmed"
            );
            return Err(AppError::invalid_transition(format!(
                "Cannot end a {} reservation",
                reservation.status
            )));
        }

        reservation.status = ReservationStatus::Completed;
        self.reservations.update(&reservation).await?;
        self.release_resource(reservation.resource_id).await?;
        info!(reservation_id = %reservation_id, "Session ended early");

        self.bus.publish(Notification::new(
            Topic::Requester(reservation.requester_id),
            EventPayload::Reservation(ReservationEvent::Completed {
                reservation_id,
                resource_id: reservation.resource_id,
                requester_id: reservation.requester_id,
            }),
            reservation.status.as_str(),
            "Your session has ended",
        ));
        Ok(reservation)
    }

    /// Expires every confirmed reservation whose session has run out.
    /// Returns how many were expired. Idempotent via the `expired_at`
    /// marker; shared by the sweep and by inline expiry on request.
    pub async fn expire_due(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let due = self.reservations.find_due_for_expiry(now).await?;
        let mut expired = 0;
        for reservation in due {
            let _guard = self.locks.resources.acquire(reservation.resource_id).await;
            if self.expire_locked(reservation, now).await? {
                expired += 1;
            }
        }
        Ok(expired)
    }

    /// Publishes one ending-soon warning for every confirmed reservation
    /// whose end time falls inside `[from, to]` and that has not been
    /// warned yet. Returns how many warnings went out. The persisted
    /// `warned_at` marker makes this warn-once under any tick cadence.
    pub async fn warn_ending(
        &self,
        now: DateTime<Utc>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<usize, AppError> {
        let due = self.reservations.find_in_warning_window(from, to).await?;
        let mut warned = 0;
        for mut reservation in due {
            let Some(end_time) = reservation.end_time else {
                continue;
            };
            let Some(minutes_left) = reservation.minutes_left(now) else {
                continue;
            };
            reservation.warned_at = Some(now);
            self.reservations.update(&reservation).await?;

            self.bus.publish(Notification::new(
                Topic::Resource(reservation.resource_id),
                EventPayload::Reservation(ReservationEvent::EndingSoon {
                    reservation_id: reservation.id,
                    resource_id: reservation.resource_id,
                    requester_id: reservation.requester_id,
                    minutes_left,
                    end_time,
                }),
                reservation.status.as_str(),
                format!("Session ending soon: {minutes_left} minutes left"),
            ));
            warned += 1;
        }
        Ok(warned)
    }

    /// Looks up a reservation by id.
    pub async fn get_reservation(&self, id: Uuid) -> Result<Reservation, AppError> {
        self.reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Reservation not found"))
    }

    /// The requester's live reservations, newest first.
    pub async fn list_live_for_requester(
        &self,
        requester_id: Uuid,
    ) -> Result<Vec<Reservation>, AppError> {
        self.reservations.find_live_by_requester(requester_id).await
    }

    /// Shared pending → confirmed transition for [`Self::approve`] and
    /// [`Self::auto_approve_via_token`].
    async fn confirm(
        &self,
        reservation_id: Uuid,
        idempotent_on_confirmed: bool,
    ) -> Result<Reservation, AppError> {
        let reservation = self.get_reservation(reservation_id).await?;
        let _guard = self.locks.resources.acquire(reservation.resource_id).await;
        let mut reservation = self.get_reservation(reservation_id).await?;

        match reservation.status {
            ReservationStatus::Pending => {}
            ReservationStatus::Confirmed if idempotent_on_confirmed => return Ok(reservation),
            status => {
                warn!(
                    reservation_id = %reservation_id,
                    status = status.as_str(),
                    "Approval rejected: illegal transition"
                );
                return Err(AppError::invalid_transition(format!(
                    "Cannot approve a {status} reservation"
                )));
            }
        }

        let now = Utc::now();
        reservation.status = ReservationStatus::Confirmed;
        reservation.start_time = Some(now);
        reservation.end_time = Some(now + Duration::minutes(reservation.requested_minutes));
        self.reservations.update(&reservation).await?;

        let resource = self.get_resource(reservation.resource_id).await?;
        self.set_occupancy(&resource, Occupancy::Occupied).await?;
        info!(
            reservation_id = %reservation_id,
            resource_id = %reservation.resource_id,
            end_time = %reservation.end_time.unwrap_or(now),
            "Reservation confirmed"
        );

        self.bus.publish(Notification::new(
            Topic::Requester(reservation.requester_id),
            EventPayload::Reservation(ReservationEvent::Approved {
                reservation_id,
                resource_id: reservation.resource_id,
                requester_id: reservation.requester_id,
                end_time: reservation.end_time.unwrap_or(now),
            }),
            reservation.status.as_str(),
            format!("Your reservation for {} was approved", resource.name),
        ));
        Ok(reservation)
    }

    /// Expires one reservation. Caller holds the resource lock. Returns
    /// `false` when another path already processed it.
    async fn expire_locked(
        &self,
        reservation: Reservation,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut reservation = match self.reservations.find_by_id(reservation.id).await? {
            Some(r) => r,
            None => return Ok(false),
        };
        if reservation.expired_at.is_some() || !reservation.is_overdue(now) {
            return Ok(false);
        }

        reservation.status = ReservationStatus::Completed;
        reservation.expired_at = Some(now);
        self.reservations.update(&reservation).await?;
        self.release_resource(reservation.resource_id).await?;
        info!(
            reservation_id = %reservation.id,
            resource_id = %reservation.resource_id,
            "Session expired"
        );

        self.bus.publish(Notification::new(
            Topic::Requester(reservation.requester_id),
            EventPayload::Reservation(ReservationEvent::Completed {
                reservation_id: reservation.id,
                resource_id: reservation.resource_id,
                requester_id: reservation.requester_id,
            }),
            reservation.status.as_str(),
            "Your session time has run out",
        ));
        Ok(true)
    }

    async fn get_resource(&self, id: Uuid) -> Result<Resource, AppError> {
        self.resources
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))
    }

    /// Moves a resource back to `available` and publishes its status.
    async fn release_resource(&self, resource_id: Uuid) -> Result<(), AppError> {
        if let Some(resource) = self.resources.find_by_id(resource_id).await? {
            self.set_occupancy(&resource, Occupancy::Available).await?;
        }
        Ok(())
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
