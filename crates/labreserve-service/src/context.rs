//! Request context carrying the authenticated requester and their role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use labreserve_entity::requester::Role;

/// Context for the current authenticated request.
///
/// Resolved once per request by the auth layer and passed into service
/// methods as an explicit parameter, so every operation knows *who* is
/// acting and with *which* role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated requester's ID.
    pub requester_id: Uuid,
    /// The requester's role.
    pub role: Role,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(requester_id: Uuid, role: Role) -> Self {
        Self {
            requester_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current requester is staff.
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Returns whether the current requester may submit block reservations.
    pub fn can_request_block(&self) -> bool {
        self.role.can_request_block()
    }
}
