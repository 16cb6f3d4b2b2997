use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use common::utils::logging::LogFormat;
use serde::Deserialize;

pub const DEFAULT_MOUNT_ROOT: &str = "/";
pub const DEFAULT_CONTAINER_ROOT: &str = "/var/vcap/data";
pub const DEFAULT_DASHBOARD_URL: &str = "http://dashboard_url";
pub const DEFAULT_POLL_INTERVAL_SECS: u32 = 10;
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub broker: BrokerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// Directory holding `service_instances.json` and `service_bindings.json`.
    #[serde(default)]
    pub data_dir: String,
    #[serde(default = "default_mount_root")]
    pub mount_root: String,
    #[serde(default = "default_container_root")]
    pub container_root: String,
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u32,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            mount_root: default_mount_root(),
            container_root: default_container_root(),
            dashboard_url: default_dashboard_url(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: String,
}

fn default_mount_root() -> String { DEFAULT_MOUNT_ROOT.into() }
fn default_container_root() -> String { DEFAULT_CONTAINER_ROOT.into() }
fn default_dashboard_url() -> String { DEFAULT_DASHBOARD_URL.into() }
fn default_poll_interval() -> u32 { DEFAULT_POLL_INTERVAL_SECS }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `CONFIG_PATH` (or `config.toml`), falling back to defaults when the
    /// file is absent, then normalize.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.broker.normalize_from_env();
        self.broker.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn is_missing_file(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .map(|e| e.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl BrokerConfig {
    pub fn normalize_from_env(&mut self) {
        if self.data_dir.trim().is_empty() {
            self.data_dir = std::env::var("BROKER_DATA_DIR")
                .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        }
        if self.mount_root.trim().is_empty() {
            self.mount_root = default_mount_root();
        }
        if self.dashboard_url.trim().is_empty() {
            self.dashboard_url = default_dashboard_url();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !Path::new(&self.container_root).is_absolute() {
            return Err(anyhow!(
                "broker.container_root must be an absolute path, got {:?}",
                self.container_root
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(anyhow!("broker.poll_interval_secs must be >= 1"));
        }
        Ok(())
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        self.log_format().map(|_| ())
    }

    /// Empty means the compact default.
    pub fn log_format(&self) -> Result<LogFormat> {
        if self.format.trim().is_empty() {
            return Ok(LogFormat::default());
        }
        LogFormat::parse(&self.format).ok_or_else(|| {
            anyhow!("logging.format must be \"compact\" or \"json\", got {:?}", self.format)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() -> Result<()> {
        let mut cfg = load_from_str("")?;
        cfg.broker.data_dir = "state".into();
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.broker.mount_root, "/");
        assert_eq!(cfg.broker.container_root, "/var/vcap/data");
        assert_eq!(cfg.broker.dashboard_url, "http://dashboard_url");
        assert_eq!(cfg.broker.poll_interval_secs, 10);
        assert_eq!(cfg.logging.log_format()?, LogFormat::Compact);
        Ok(())
    }

    #[test]
    fn parses_broker_section() -> Result<()> {
        let cfg = load_from_str(
            r#"
            [broker]
            data_dir = "/srv/broker"
            container_root = "/mnt/shares"
            poll_interval_secs = 30

            [logging]
            format = "json"
            "#,
        )?;
        assert_eq!(cfg.broker.data_path(), PathBuf::from("/srv/broker"));
        assert_eq!(cfg.broker.container_root, "/mnt/shares");
        assert_eq!(cfg.broker.poll_interval_secs, 30);
        assert_eq!(cfg.logging.log_format()?, LogFormat::Json);
        Ok(())
    }

    #[test]
    fn rejects_bad_values() -> Result<()> {
        let mut relative = load_from_str("[broker]\ndata_dir = \"x\"\ncontainer_root = \"data\"")?;
        assert!(relative.normalize_and_validate().is_err());

        let mut zero = load_from_str("[broker]\ndata_dir = \"x\"\npoll_interval_secs = 0")?;
        assert!(zero.normalize_and_validate().is_err());

        let mut fmt = load_from_str("[broker]\ndata_dir = \"x\"\n[logging]\nformat = \"pretty\"")?;
        assert!(fmt.normalize_and_validate().is_err());
        Ok(())
    }

    #[test]
    fn missing_file_is_detected() {
        let err = load_from_file("/nonexistent-broker-config.toml").unwrap_err();
        assert!(is_missing_file(&err));
    }
}
