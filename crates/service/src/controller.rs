use std::sync::Arc;

use async_trait::async_trait;
use models::catalog::Catalog;
use models::instance::CreateServiceInstanceResponse;
use models::volume::CreateServiceBindingResponse;
use models::{ServiceBinding, ServiceInstance};
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::binding::{self, BindingEngine};
use crate::catalog;
use crate::client::StorageClient;
use crate::errors::BrokerError;
use crate::provisioning::ProvisioningEngine;
use crate::settings::BrokerSettings;
use crate::storage::{LifecycleStore, PersistenceGateway, BINDINGS_FILE, INSTANCES_FILE};

/// Operations the broker-protocol front end maps its requests onto.
///
/// Conflict detection is the caller's job: check `*_exists` and
/// `*_properties_match` before calling a create/bind operation, which
/// overwrite unconditionally.
#[async_trait]
pub trait Controller: Send + Sync {
    fn catalog(&self) -> Catalog;
    async fn create_service_instance(
        &self,
        instance_id: &str,
        instance: ServiceInstance,
    ) -> Result<CreateServiceInstanceResponse, BrokerError>;
    async fn service_instance_exists(&self, instance_id: &str) -> bool;
    async fn service_instance_properties_match(
        &self,
        instance_id: &str,
        instance: &ServiceInstance,
    ) -> bool;
    async fn delete_service_instance(&self, instance_id: &str) -> Result<(), BrokerError>;
    async fn bind_service_instance(
        &self,
        instance_id: &str,
        binding_id: &str,
        binding: ServiceBinding,
    ) -> Result<CreateServiceBindingResponse, BrokerError>;
    async fn service_binding_exists(&self, instance_id: &str, binding_id: &str) -> bool;
    async fn service_binding_properties_match(
        &self,
        instance_id: &str,
        binding_id: &str,
        binding: &ServiceBinding,
    ) -> bool;
    async fn get_binding(
        &self,
        instance_id: &str,
        binding_id: &str,
    ) -> Result<ServiceBinding, BrokerError>;
    async fn unbind_service_instance(
        &self,
        instance_id: &str,
        binding_id: &str,
    ) -> Result<(), BrokerError>;
}

/// Default [`Controller`]: one lock over the lifecycle store, held for the
/// whole of each operation including backend and snapshot I/O.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use service::client::mock::MockStorageClient;
/// use service::controller::{BrokerController, Controller};
/// use service::settings::BrokerSettings;
/// use service::storage::PersistenceGateway;
/// use models::ServiceInstance;
///
/// let base = std::env::temp_dir().join(format!("broker_doc_{}", std::process::id()));
/// let ctl = BrokerController::new(
///     Arc::new(MockStorageClient::new()),
///     PersistenceGateway::new(&base),
///     BrokerSettings::default(),
/// );
/// let req = ServiceInstance { plan_id: "free-plan-guid".into(), ..Default::default() };
/// let resp = tokio_test::block_on(ctl.create_service_instance("i1", req.clone())).unwrap();
/// assert_eq!(resp.last_operation.state, "in progress");
/// assert!(tokio_test::block_on(ctl.service_instance_properties_match("i1", &req)));
/// let _ = std::fs::remove_dir_all(&base);
/// ```
pub struct BrokerController<C: StorageClient + ?Sized> {
    client: Arc<C>,
    state: Mutex<LifecycleStore>,
    gateway: PersistenceGateway,
    settings: BrokerSettings,
}

impl<C: StorageClient + ?Sized> BrokerController<C> {
    /// Start with empty state.
    pub fn new(client: Arc<C>, gateway: PersistenceGateway, settings: BrokerSettings) -> Self {
        Self::with_store(client, gateway, settings, LifecycleStore::default())
    }

    pub fn with_store(
        client: Arc<C>,
        gateway: PersistenceGateway,
        settings: BrokerSettings,
        store: LifecycleStore,
    ) -> Self {
        Self { client, state: Mutex::new(store), gateway, settings }
    }

    /// Restore instances and bindings from the gateway's base path.
    #[instrument(skip_all, fields(base_path = %gateway.base_path().display()))]
    pub async fn open(
        client: Arc<C>,
        gateway: PersistenceGateway,
        settings: BrokerSettings,
    ) -> Result<Self, BrokerError> {
        let instances = gateway.load::<ServiceInstance>(INSTANCES_FILE).await?;
        let bindings = gateway.load::<ServiceBinding>(BINDINGS_FILE).await?;
        info!(instances = instances.len(), bindings = bindings.len(), "broker state restored");
        Ok(Self::with_store(client, gateway, settings, LifecycleStore::new(instances, bindings)))
    }

    pub fn settings(&self) -> &BrokerSettings {
        &self.settings
    }

    /// Sorted ids of every known instance.
    pub async fn instance_ids(&self) -> Vec<String> {
        let state = self.state.lock().await;
        let mut ids: Vec<String> = state.instances().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Sorted ids of every known binding.
    pub async fn binding_ids(&self) -> Vec<String> {
        let state = self.state.lock().await;
        let mut ids: Vec<String> = state.bindings().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn provisioning(&self) -> ProvisioningEngine<'_, C> {
        ProvisioningEngine::new(&*self.client, &self.gateway, &self.settings)
    }

    fn binding_engine(&self) -> BindingEngine<'_, C> {
        BindingEngine::new(&*self.client, &self.gateway, &self.settings)
    }
}

#[async_trait]
impl<C: StorageClient + ?Sized + 'static> Controller for BrokerController<C> {
    #[instrument(skip_all)]
    fn catalog(&self) -> Catalog {
        catalog::catalog()
    }

    #[instrument(skip(self, instance), fields(plan_id = %instance.plan_id))]
    async fn create_service_instance(
        &self,
        instance_id: &str,
        instance: ServiceInstance,
    ) -> Result<CreateServiceInstanceResponse, BrokerError> {
        let mut state = self.state.lock().await;
        self.provisioning().create_instance(&mut state, instance_id, instance).await
    }

    #[instrument(skip(self))]
    async fn service_instance_exists(&self, instance_id: &str) -> bool {
        self.state.lock().await.instance_exists(instance_id)
    }

    #[instrument(skip(self, instance))]
    async fn service_instance_properties_match(
        &self,
        instance_id: &str,
        instance: &ServiceInstance,
    ) -> bool {
        self.state.lock().await.instance_properties_match(instance_id, instance)
    }

    #[instrument(skip(self))]
    async fn delete_service_instance(&self, instance_id: &str) -> Result<(), BrokerError> {
        let mut state = self.state.lock().await;
        self.provisioning().delete_instance(&mut state, instance_id).await
    }

    #[instrument(skip(self, binding), fields(app_id = %binding.app_id))]
    async fn bind_service_instance(
        &self,
        instance_id: &str,
        binding_id: &str,
        binding: ServiceBinding,
    ) -> Result<CreateServiceBindingResponse, BrokerError> {
        let mut state = self.state.lock().await;
        self.binding_engine().bind(&mut state, instance_id, binding_id, binding).await
    }

    #[instrument(skip(self))]
    async fn service_binding_exists(&self, instance_id: &str, binding_id: &str) -> bool {
        self.state.lock().await.binding_exists(instance_id, binding_id)
    }

    #[instrument(skip(self, binding))]
    async fn service_binding_properties_match(
        &self,
        instance_id: &str,
        binding_id: &str,
        binding: &ServiceBinding,
    ) -> bool {
        self.state.lock().await.binding_properties_match(instance_id, binding_id, binding)
    }

    #[instrument(skip(self))]
    async fn get_binding(
        &self,
        instance_id: &str,
        binding_id: &str,
    ) -> Result<ServiceBinding, BrokerError> {
        let state = self.state.lock().await;
        binding::get_binding(&state, binding_id)
    }

    #[instrument(skip(self))]
    async fn unbind_service_instance(
        &self,
        instance_id: &str,
        binding_id: &str,
    ) -> Result<(), BrokerError> {
        let mut state = self.state.lock().await;
        self.binding_engine().unbind(&mut state, binding_id).await
    }
}
