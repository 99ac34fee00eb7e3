//! Resource registry service.

use std::net::IpAddr;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use labreserve_core::AppError;
use labreserve_core::events::{EventPayload, Notification, ResourceEvent};
use labreserve_core::types::Topic;
use labreserve_database::{ReservationStore, ResourceStore};
use labreserve_entity::resource::{Condition, Connectivity, Resource};
use labreserve_realtime::NotificationBus;

use crate::context::RequestContext;
use crate::locks::ReservationLocks;
use crate::publish;

/// Manages the fixed set of bookable resources and their state axes.
///
/// Occupancy is never written here; only the ledger, the allocator, and
/// the sweep move it, through their own transition operations. Removal
/// takes the same per-resource lock the ledger claims under, so a
/// resource is never deleted while a reservation request is in flight
/// against it.
#[derive(Debug, Clone)]
pub struct RegistryService {
    resources: Arc<dyn ResourceStore>,
    reservations: Arc<dyn ReservationStore>,
    bus: Arc<NotificationBus>,
    locks: Arc<ReservationLocks>,
    registration: Arc<Mutex<()>>,
}

impl RegistryService {
    /// Creates a new registry service.
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        reservations: Arc<dyn ReservationStore>,
        bus: Arc<NotificationBus>,
        locks: Arc<ReservationLocks>,
    ) -> Self {
        Self {
            resources,
            reservations,
            bus,
            locks,
            registration: Arc::new(Mutex::new(())),
        }
    }

    /// Registers a new resource (staff).
    pub async fn register(
        &self,
        ctx: &RequestContext,
        name: &str,
        address: IpAddr,
    ) -> Result<Resource, AppError> {
        if !ctx.is_staff() {
            return Err(AppError::authorization("Only staff may register resources"));
        }
        if name.trim().is_empty() {
            return Err(AppError::validation("Resource name must not be empty"));
        }

        // Uniqueness is check-then-insert, so registrations take turns.
        let _registration_guard = self.registration.lock().await;

        if self.resources.find_by_name(name).await?.is_some() {
            return Err(AppError::duplicate_resource(format!(
                "A resource named {name} is already registered"
            )));
        }
        if self.resources.find_by_address(address).await?.is_some() {
            return Err(AppError::duplicate_resource(format!(
                "A resource with address {address} is already registered"
            )));
        }

        let resource = Resource::new(name, address);
        self.resources.insert(&resource).await?;
        info!(resource_id = %resource.id, name, "Resource registered");

        self.bus.publish(Notification::new(
            Topic::ResourceStatusBroadcast,
            EventPayload::Resource(ResourceEvent::Registered {
                resource_id: resource.id,
                name: resource.name.clone(),
            }),
            resource.occupancy.as_str(),
            format!("{} registered", resource.name),
        ));
        Ok(resource)
    }

    /// Sets a resource's physical condition (staff).
    pub async fn set_condition(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        condition: Condition,
    ) -> Result<Resource, AppError> {
        if !ctx.is_staff() {
            return Err(AppError::authorization(
                "Only staff may change a resource's condition",
            ));
        }
        let mut resource = self.get(id).await?;
        self.resources.set_condition(id, condition).await?;
        resource.condition = condition;
        info!(resource_id = %id, condition = condition.as_str(), "Resource condition changed");

        let available = self.resources.count_available().await?;
        publish::resource_status(&self.bus, &resource, available);
        Ok(resource)
    }

    /// Sets a resource's network connectivity. Driven by an external
    /// liveness probe, so not role-gated.
    pub async fn set_connectivity(
        &self,
        id: Uuid,
        connectivity: Connectivity,
    ) -> Result<Resource, AppError> {
        let mut resource = self.get(id).await?;
        self.resources.set_connectivity(id, connectivity).await?;
        resource.connectivity = connectivity;
        info!(
            resource_id = %id,
            connectivity = connectivity.as_str(),
            "Resource connectivity changed"
        );

        let available = self.resources.count_available().await?;
        publish::resource_status(&self.bus, &resource, available);
        Ok(resource)
    }

    /// Removes a resource (staff). Fails while any non-terminal
    /// reservation still references it; there is no silent cascade.
    pub async fn remove(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        if !ctx.is_staff() {
            return Err(AppError::authorization("Only staff may remove resources"));
        }
        // Same lock the ledger inserts under; an in-flight request either
        // lands before the check or waits until the delete is done.
        let _guard = self.locks.resources.acquire(id).await;
        let resource = self.get(id).await?;
        if self.reservations.find_live_by_resource(id).await?.is_some() {
            return Err(AppError::resource_in_use(format!(
                "{} has a live reservation and cannot be removed",
                resource.name
            )));
        }
        self.resources.delete(id).await?;
        info!(resource_id = %id, name = %resource.name, "Resource removed");

        self.bus.publish(Notification::new(
            Topic::ResourceStatusBroadcast,
            EventPayload::Resource(ResourceEvent::Removed {
                resource_id: id,
                name: resource.name.clone(),
            }),
            "removed",
            format!("{} removed", resource.name),
        ));
        Ok(())
    }

    /// Looks up a resource by id.
    pub async fn get(&self, id: Uuid) -> Result<Resource, AppError> {
        self.resources
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))
    }

    /// All resources in display order.
    pub async fn list_all(&self) -> Result<Vec<Resource>, AppError> {
        self.resources.list_all().await
    }

    /// Bookable resources in display order.
    pub async fn list_available(&self) -> Result<Vec<Resource>, AppError> {
        self.resources.list_available().await
    }
}
