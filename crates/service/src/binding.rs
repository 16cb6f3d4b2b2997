use models::errors::ModelError;
use models::parameters::{string_param, Parameters};
use models::volume::{
    CephConfig, CreateServiceBindingResponse, Credentials, VolumeMount, VolumeMountPrivateDetails,
};
use models::ServiceBinding;
use tracing::{error, info};

use crate::client::StorageClient;
use crate::errors::BrokerError;
use crate::settings::BrokerSettings;
use crate::storage::{LifecycleStore, PersistenceGateway, BINDINGS_FILE};

pub const VOLUME_DRIVER: &str = "cephfs";
pub const MOUNT_MODE_RW: &str = "rw";
pub const CONTAINER_PATH_KEY: &str = "container_path";
pub const PATH_KEY: &str = "path";

/// Where the share shows up inside the consumer container.
///
/// `container_path` wins over `path`; with neither, the share lands at
/// `<container_root>/<instance_id>`. Explicit values are taken verbatim.
pub fn container_mount_path(
    parameters: &Parameters,
    instance_id: &str,
    container_root: &str,
) -> Result<String, ModelError> {
    if let Some(path) = string_param(parameters, CONTAINER_PATH_KEY)? {
        return Ok(path.to_string());
    }
    if let Some(path) = string_param(parameters, PATH_KEY)? {
        return Ok(path.to_string());
    }
    Ok(default_mount_path(container_root, instance_id))
}

/// `<container_root>/<instance_id>` with the id treated as relative: leading
/// slashes, `.` and `..` segments are folded so the result stays under the
/// root.
fn default_mount_path(container_root: &str, instance_id: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in instance_id.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    let root = container_root.trim_end_matches('/');
    if segments.is_empty() {
        return if root.is_empty() { "/".to_string() } else { root.to_string() };
    }
    format!("{}/{}", root, segments.join("/"))
}

/// Issues and revokes bindings.
///
/// Bind resolves everything it needs from the backend before recording the
/// binding, so a backend failure leaves no trace in the store.
pub struct BindingEngine<'a, C: StorageClient + ?Sized> {
    client: &'a C,
    gateway: &'a PersistenceGateway,
    settings: &'a BrokerSettings,
}

impl<'a, C: StorageClient + ?Sized> BindingEngine<'a, C> {
    pub fn new(client: &'a C, gateway: &'a PersistenceGateway, settings: &'a BrokerSettings) -> Self {
        Self { client, gateway, settings }
    }

    pub async fn bind(
        &self,
        store: &mut LifecycleStore,
        instance_id: &str,
        binding_id: &str,
        binding: ServiceBinding,
    ) -> Result<CreateServiceBindingResponse, BrokerError> {
        let container_path = container_mount_path(&binding.parameters, instance_id, &self.settings.container_root)?;

        let share_path = self.client.path_for_share(instance_id).await.map_err(|e| {
            error!(error = %e, "share path lookup failed");
            e
        })?;
        let details = self.client.config_details().await.map_err(|e| {
            error!(error = %e, "config details lookup failed");
            e
        })?;

        let private = VolumeMountPrivateDetails {
            driver: VOLUME_DRIVER.to_string(),
            group_id: instance_id.to_string(),
            config: CephConfig { mds: details.mds, keyring: details.keyring, remote_mountpoint: share_path },
        };
        let mount = VolumeMount { container_path, mode: MOUNT_MODE_RW.to_string(), private };
        let response = CreateServiceBindingResponse {
            credentials: Credentials { uri: String::new() },
            volume_mounts: vec![mount],
        };

        store.insert_binding(binding_id, binding);
        self.gateway.persist(store.bindings(), BINDINGS_FILE).await?;

        info!(container_path = %response.volume_mounts[0].container_path, "binding issued");
        Ok(response)
    }

    /// Removing an unknown binding is not an error.
    pub async fn unbind(&self, store: &mut LifecycleStore, binding_id: &str) -> Result<(), BrokerError> {
        let existed = store.remove_binding(binding_id).is_some();
        self.gateway.persist(store.bindings(), BINDINGS_FILE).await.map_err(|e| {
            error!(error = %e, "unbind persist failed");
            e
        })?;
        info!(existed, "binding removed");
        Ok(())
    }
}

pub fn get_binding(store: &LifecycleStore, binding_id: &str) -> Result<ServiceBinding, BrokerError> {
    store.binding(binding_id).cloned().ok_or_else(|| BrokerError::not_found("binding"))
}
