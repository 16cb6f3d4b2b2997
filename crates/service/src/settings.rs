use std::path::PathBuf;

use configs::{
    BrokerConfig, DEFAULT_CONTAINER_ROOT, DEFAULT_DASHBOARD_URL, DEFAULT_DATA_DIR, DEFAULT_MOUNT_ROOT,
    DEFAULT_POLL_INTERVAL_SECS,
};

/// Runtime knobs for the provisioning and binding engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerSettings {
    /// Where the shared filesystem is mounted when it is not already.
    pub mount_root: String,
    /// Parent of the default in-container mount path.
    pub container_root: String,
    pub dashboard_url: String,
    pub poll_interval_secs: u32,
    pub data_dir: PathBuf,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            mount_root: DEFAULT_MOUNT_ROOT.to_string(),
            container_root: DEFAULT_CONTAINER_ROOT.to_string(),
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl From<&BrokerConfig> for BrokerSettings {
    fn from(cfg: &BrokerConfig) -> Self {
        Self {
            mount_root: cfg.mount_root.clone(),
            container_root: cfg.container_root.clone(),
            dashboard_url: cfg.dashboard_url.clone(),
            poll_interval_secs: cfg.poll_interval_secs,
            data_dir: cfg.data_path(),
        }
    }
}
