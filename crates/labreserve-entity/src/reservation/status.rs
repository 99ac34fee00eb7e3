//! Reservation lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a reservation.
///
/// Legal transitions: `Pending → Confirmed → Completed`,
/// `Pending → Cancelled`, `Confirmed → Cancelled` (early end by decline
/// path is Pending → Cancelled; early session end is Confirmed →
/// Completed). Anything else is an invalid transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Waiting for approval. Initial state, set by the ledger.
    Pending,
    /// Approved; the session is running until `end_time`.
    Confirmed,
    /// Declined, cancelled, or blocked. Terminal.
    Cancelled,
    /// Session finished (expiry or explicit end). Terminal.
    Completed,
}

impl ReservationStatus {
    /// Whether this status is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Whether the reservation still occupies its resource.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// The status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = labreserve_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(labreserve_core::AppError::validation(format!(
                "Invalid reservation status: '{s}'. Expected one of: pending, confirmed, cancelled, completed"
            ))),
        }
    }
}
