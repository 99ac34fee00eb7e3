//! Domain events published on the notification bus.
//!
//! Events are wrapped in a [`Notification`] envelope carrying the topic,
//! a renderable message, a status string, and a timestamp. The payload is
//! a tagged union; every variant carries the ids a subscriber needs to
//! re-poll authoritative state, because delivery is at-most-once.

pub mod block;
pub mod reservation;
pub mod resource;
pub mod violation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use block::BlockEvent;
pub use reservation::ReservationEvent;
pub use resource::ResourceEvent;
pub use violation::ViolationEvent;

use crate::types::Topic;

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A resource-related event.
    Resource(ResourceEvent),
    /// A reservation-related event.
    Reservation(ReservationEvent),
    /// A block-reservation-related event.
    Block(BlockEvent),
    /// A violation-related event.
    Violation(ViolationEvent),
}

impl EventPayload {
    /// The resource this event concerns, if any.
    pub fn resource_id(&self) -> Option<Uuid> {
        match self {
            Self::Resource(e) => Some(e.resource_id()),
            Self::Reservation(e) => Some(e.resource_id()),
            Self::Block(_) => None,
            Self::Violation(e) => e.resource_id(),
        }
    }

    /// The reservation this event concerns, if any.
    pub fn reservation_id(&self) -> Option<Uuid> {
        match self {
            Self::Reservation(e) => Some(e.reservation_id()),
            _ => None,
        }
    }

    /// The requester this event concerns, if any.
    pub fn requester_id(&self) -> Option<Uuid> {
        match self {
            Self::Resource(_) => None,
            Self::Reservation(e) => Some(e.requester_id()),
            Self::Block(e) => Some(e.requester_id()),
            Self::Violation(e) => Some(e.requester_id()),
        }
    }
}

/// Envelope for every message published on the notification bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// The topic the event was published on (wire name).
    pub topic: String,
    /// The event payload.
    pub payload: EventPayload,
    /// Status string for the subject of the event (e.g. an occupancy or
    /// reservation status), suitable for direct display.
    pub status: String,
    /// Human-readable message.
    pub message: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Create a new notification for the given topic.
    pub fn new(
        topic: Topic,
        payload: EventPayload,
        status: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.name(),
            payload,
            status: status.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
