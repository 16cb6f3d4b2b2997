use models::instance::{CreateServiceInstanceResponse, LastOperation, ServiceInstance};
use tracing::{error, info};

use crate::client::StorageClient;
use crate::errors::BrokerError;
use crate::settings::BrokerSettings;
use crate::storage::{LifecycleStore, PersistenceGateway, INSTANCES_FILE};

pub const CREATING_DESCRIPTION: &str = "creating service instance...";

/// Creates and deletes instances: backend share first, then the lifecycle
/// map, then the snapshot.
pub struct ProvisioningEngine<'a, C: StorageClient + ?Sized> {
    client: &'a C,
    gateway: &'a PersistenceGateway,
    settings: &'a BrokerSettings,
}

impl<'a, C: StorageClient + ?Sized> ProvisioningEngine<'a, C> {
    pub fn new(client: &'a C, gateway: &'a PersistenceGateway, settings: &'a BrokerSettings) -> Self {
        Self { client, gateway, settings }
    }

    /// Overwrites any existing record for `instance_id`; duplicate and
    /// conflict checks belong to the caller.
    pub async fn create_instance(
        &self,
        store: &mut LifecycleStore,
        instance_id: &str,
        mut instance: ServiceInstance,
    ) -> Result<CreateServiceInstanceResponse, BrokerError> {
        if !self.client.is_filesystem_mounted().await {
            let mountpoint = self.client.mount_filesystem(&self.settings.mount_root).await.map_err(|e| {
                error!(error = %e, mount_root = %self.settings.mount_root, "mount failed");
                e
            })?;
            info!(%mountpoint, "filesystem mounted");
        }

        let mountpoint = self.client.create_share(instance_id).await.map_err(|e| {
            error!(error = %e, "create share failed");
            e
        })?;

        instance.dashboard_url = self.settings.dashboard_url.clone();
        instance.id = instance_id.to_string();
        let last_operation = LastOperation::in_progress(CREATING_DESCRIPTION, self.settings.poll_interval_secs);
        instance.last_operation = Some(last_operation.clone());

        let response = CreateServiceInstanceResponse {
            dashboard_url: instance.dashboard_url.clone(),
            last_operation,
        };

        store.insert_instance(instance_id, instance);
        self.gateway.persist(store.instances(), INSTANCES_FILE).await?;

        info!(%mountpoint, "share created");
        Ok(response)
    }

    pub async fn delete_instance(&self, store: &mut LifecycleStore, instance_id: &str) -> Result<(), BrokerError> {
        self.client.delete_share(instance_id).await.map_err(|e| {
            error!(error = %e, "delete share failed");
            e
        })?;

        store.remove_instance(instance_id);
        self.gateway.persist(store.instances(), INSTANCES_FILE).await?;
        info!("share deleted");
        Ok(())
    }
}
