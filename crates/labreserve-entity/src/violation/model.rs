//! Violation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::severity::Severity;

/// Whether a violation currently suspends its requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "violation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ViolationStatus {
    /// Not suspending (warning, or suspension lifted).
    Active,
    /// Suspending the requester from booking.
    Suspended,
}

impl ViolationStatus {
    /// The status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }
}

/// A recorded infraction with a severity-determined suspension consequence.
///
/// Released either by the timed sweep (`Moderate`, via `suspension_end_at`)
/// or by an explicit staff review (`Major`, which also flips
/// `slip_reviewed`). `Minor` violations never enter `Suspended`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Violation {
    /// Unique violation identifier.
    pub id: Uuid,
    /// The sanctioned requester.
    pub requester_id: Uuid,
    /// The resource involved, if any.
    pub resource_id: Option<Uuid>,
    /// Severity level.
    pub severity: Severity,
    /// Why the violation was recorded.
    pub reason: String,
    /// Whether the violation currently suspends the requester.
    pub status: ViolationStatus,
    /// Whether the violation has been fully resolved.
    pub resolved: bool,
    /// When a moderate suspension lifts. Meaningless for other severities.
    pub suspension_end_at: Option<DateTime<Utc>>,
    /// Whether the physical violation slip was reviewed. Major only.
    pub slip_reviewed: bool,
    /// When the violation was recorded.
    pub created_at: DateTime<Utc>,
}

impl Violation {
    /// Record a new violation. Status and `suspension_end_at` follow from
    /// the severity; `moderate_end` supplies the lift time for `Moderate`.
    pub fn new(
        requester_id: Uuid,
        resource_id: Option<Uuid>,
        severity: Severity,
        reason: impl Into<String>,
        moderate_end: Option<DateTime<Utc>>,
    ) -> Self {
        let status = if severity.suspends() {
            ViolationStatus::Suspended
        } else {
            ViolationStatus::Active
        };
        Self {
            id: Uuid::new_v4(),
            requester_id,
            resource_id,
            severity,
            reason: reason.into(),
            status,
            resolved: false,
            suspension_end_at: if severity == Severity::Moderate {
                moderate_end
            } else {
                None
            },
            slip_reviewed: false,
            created_at: Utc::now(),
        }
    }

    /// Whether this violation blocks booking right now.
    pub fn blocks_booking(&self) -> bool {
        !self.resolved && self.severity.suspends() && self.status == ViolationStatus::Suspended
    }

    /// Whether the timed sweep may auto-release this violation.
    pub fn auto_releasable(&self, now: DateTime<Utc>) -> bool {
        self.severity == Severity::Moderate
            && self.status == ViolationStatus::Suspended
            && !self.resolved
            && self.suspension_end_at.is_some_and(|end| end <= now)
    }
}
