//! Shared notification helpers.
//!
//! Publishing is best-effort: a dropped notification never fails or
//! rolls back the state mutation that produced it.

use labreserve_core::events::{EventPayload, Notification, ResourceEvent};
use labreserve_core::types::Topic;
use labreserve_entity::resource::Resource;
use labreserve_realtime::NotificationBus;

/// Publish a resource's current status on its own topic and on the
/// global broadcast topic.
pub(crate) fn resource_status(bus: &NotificationBus, resource: &Resource, available_count: u64) {
    let status = resource.occupancy.as_str();
    let message = format!("{} is {status}", resource.name);
    let event = ResourceEvent::StatusChanged {
        resource_id: resource.id,
        name: resource.name.clone(),
        occupancy: status.to_string(),
        available_count,
    };
    bus.publish(Notification::new(
        Topic::Resource(resource.id),
        EventPayload::Resource(event.clone()),
        status,
        message.clone(),
    ));
    bus.publish(Notification::new(
        Topic::ResourceStatusBroadcast,
        EventPayload::Resource(event),
        status,
        message,
    ));
}
