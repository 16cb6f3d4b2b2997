use std::process::ExitCode;
use std::sync::Arc;

use async_trait::async_trait;
use dotenvy::dotenv;
use serde_json::json;
use service::client::{BackendError, ConfigDetails, StorageClient};
use service::settings::BrokerSettings;
use service::storage::PersistenceGateway;
use service::{BrokerController, Controller};
use tracing::{error, info};
use uuid::Uuid;

/// Backend stand-in for offline inspection: reports nothing mounted and
/// refuses every side effect.
struct DetachedBackend;

#[async_trait]
impl StorageClient for DetachedBackend {
    async fn is_filesystem_mounted(&self) -> bool { false }
    async fn mount_filesystem(&self, _path: &str) -> Result<String, BackendError> { Err(detached()) }
    async fn create_share(&self, _share: &str) -> Result<String, BackendError> { Err(detached()) }
    async fn delete_share(&self, _share: &str) -> Result<(), BackendError> { Err(detached()) }
    async fn path_for_share(&self, _share: &str) -> Result<String, BackendError> { Err(detached()) }
    async fn config_details(&self) -> Result<ConfigDetails, BackendError> { Err(detached()) }
}

fn detached() -> BackendError {
    BackendError::new("storage backend not attached")
}

async fn report(cfg: configs::AppConfig) -> anyhow::Result<()> {
    let settings = BrokerSettings::from(&cfg.broker);
    common::env::ensure_data_dir(&settings.data_dir).await?;

    let gateway = PersistenceGateway::new(settings.data_dir.clone());
    let controller = BrokerController::open(Arc::new(DetachedBackend), gateway, settings).await?;

    let body = json!({
        "data_dir": controller.settings().data_dir.display().to_string(),
        "catalog": controller.catalog(),
        "instances": controller.instance_ids().await,
        "bindings": controller.binding_ids().await,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn main() -> ExitCode {
    // .env first so RUST_LOG, CONFIG_PATH and BROKER_DATA_DIR apply
    dotenv().ok();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "broker", event = "config_invalid", error = %e, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };
    // validated above, so the format is known
    common::utils::logging::init_logging(cfg.logging.log_format().unwrap_or_default());

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "broker",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    info!(service = "broker", event = "start", %service_id, pid, version, "broker state report starting");

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "broker", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(report(cfg)) {
        Ok(()) => {
            info!(service = "broker", event = "stop", %service_id, pid, "broker state report finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "broker", event = "run_failed", error = %e, "broker state report failed");
            ExitCode::FAILURE
        }
    }
}
