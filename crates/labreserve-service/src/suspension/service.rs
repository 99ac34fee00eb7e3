//! Suspension policy service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use labreserve_core::AppError;
use labreserve_core::config::suspension::SuspensionConfig;
use labreserve_core::events::{EventPayload, Notification, ViolationEvent};
use labreserve_core::types::Topic;
use labreserve_database::ViolationStore;
use labreserve_entity::violation::{Severity, Violation, ViolationStatus};
use labreserve_realtime::NotificationBus;

use crate::context::RequestContext;

/// Records violations and answers whether a requester may book.
///
/// The severity determines the consequence deterministically: `Minor` is
/// a warning, `Moderate` suspends until a configured number of days has
/// passed (lifted by the sweep), `Major` suspends until staff release it
/// manually.
#[derive(Debug, Clone)]
pub struct SuspensionService {
    violations: Arc<dyn ViolationStore>,
    bus: Arc<NotificationBus>,
    config: SuspensionConfig,
}

impl SuspensionService {
    /// Creates a new suspension service.
    pub fn new(
        violations: Arc<dyn ViolationStore>,
        bus: Arc<NotificationBus>,
        config: SuspensionConfig,
    ) -> Self {
        Self {
            violations,
            bus,
            config,
        }
    }

    /// Records a violation against a requester (staff).
    pub async fn record_violation(
        &self,
        ctx: &RequestContext,
        requester_id: Uuid,
        resource_id: Option<Uuid>,
        severity: Severity,
        reason: &str,
    ) -> Result<Violation, AppError> {
        if !ctx.is_staff() {
            return Err(AppError::authorization("Only staff may record violations"));
        }
        let moderate_end = Utc::now() + Duration::days(self.config.moderate_suspension_days);
        let violation = Violation::new(
            requester_id,
            resource_id,
            severity,
            reason,
            Some(moderate_end),
        );
        self.violations.insert(&violation).await?;
        info!(
            violation_id = %violation.id,
            requester_id = %requester_id,
            severity = %severity,
            "Violation recorded"
        );

        let message = match severity {
            Severity::Minor => format!("Warning recorded: {reason}"),
            Severity::Moderate => format!(
                "You are suspended until {}: {reason}",
                moderate_end.format("%Y-%m-%d %H:%M UTC")
            ),
            Severity::Major => {
                format!("You are suspended pending a staff review: {reason}")
            }
        };
        self.bus.publish(Notification::new(
            Topic::Requester(requester_id),
            EventPayload::Violation(ViolationEvent::Recorded {
                violation_id: violation.id,
                requester_id,
                resource_id,
                severity: severity.to_string(),
                suspension_end_at: violation.suspension_end_at,
            }),
            violation.status.as_str(),
            message,
        ));
        Ok(violation)
    }

    /// The violation currently blocking the requester from booking, if
    /// any: the most recent unresolved one when it is a suspending one.
    pub async fn blocking_violation(
        &self,
        requester_id: Uuid,
    ) -> Result<Option<Violation>, AppError> {
        let latest = self.violations.find_latest_unresolved(requester_id).await?;
        Ok(latest.filter(Violation::blocks_booking))
    }

    /// Whether the requester is currently blocked from booking.
    pub async fn is_blocked(&self, requester_id: Uuid) -> Result<bool, AppError> {
        Ok(self.blocking_violation(requester_id).await?.is_some())
    }

    /// Lifts every moderate suspension whose lift time has passed.
    /// Returns how many were released. Major suspensions are never
    /// touched here.
    pub async fn auto_release_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let due = self.violations.find_auto_releasable(now).await?;
        let mut released = 0;
        for mut violation in due {
            // Re-check in case a manual release raced this pass.
            if !violation.auto_releasable(now) {
                continue;
            }
            self.release(&mut violation).await?;
            released += 1;
        }
        Ok(released)
    }

    /// Releases a suspension by staff decision (staff). For `Major`
    /// violations the release itself implies the slip was reviewed.
    pub async fn manual_release(
        &self,
        ctx: &RequestContext,
        violation_id: Uuid,
    ) -> Result<Violation, AppError> {
        if !ctx.is_staff() {
            return Err(AppError::authorization("Only staff may release suspensions"));
        }
        let mut violation = self
            .violations
            .find_by_id(violation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Violation not found"))?;
        if violation.resolved {
            return Err(AppError::invalid_transition(
                "Violation is already resolved",
            ));
        }
        if violation.severity == Severity::Major {
            violation.slip_reviewed = true;
        }
        self.release(&mut violation).await?;
        Ok(violation)
    }

    /// All violations for a requester, newest first.
    pub async fn list_for_requester(&self, requester_id: Uuid) -> Result<Vec<Violation>, AppError> {
        self.violations.find_by_requester(requester_id).await
    }

    async fn release(&self, violation: &mut Violation) -> Result<(), AppError> {
        violation.status = ViolationStatus::Active;
        violation.resolved = true;
        self.violations.update(violation).await?;
        info!(
            violation_id = %violation.id,
            requester_id = %violation.requester_id,
            severity = %violation.severity,
            "Suspension released"
        );

        self.bus.publish(Notification::new(
            Topic::Requester(violation.requester_id),
            EventPayload::Violation(ViolationEvent::Reinstated {
                violation_id: violation.id,
                requester_id: violation.requester_id,
                severity: violation.severity.to_string(),
            }),
            violation.status.as_str(),
            "Your suspension has been lifted; you may book again",
        ));
        Ok(())
    }
}
