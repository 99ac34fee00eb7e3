//! Requester role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The capability of a requester, resolved once per request by the auth
/// collaborator and passed explicitly into every ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "requester_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Books single resources for own use.
    Student,
    /// May additionally submit block reservations for a class.
    Faculty,
    /// Approves/declines reservations, manages resources and violations.
    Staff,
}

impl Role {
    /// Whether this role may perform staff-gated operations.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Staff)
    }

    /// Whether this role may submit block reservations.
    pub fn can_request_block(&self) -> bool {
        matches!(self, Self::Faculty | Self::Staff)
    }

    /// The role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = labreserve_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "faculty" => Ok(Self::Faculty),
            "staff" => Ok(Self::Staff),
            _ => Err(labreserve_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: student, faculty, staff"
            ))),
        }
    }
}
