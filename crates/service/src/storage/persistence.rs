use std::{collections::HashMap, path::{Path, PathBuf}, sync::Arc};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::errors::BrokerError;

pub const INSTANCES_FILE: &str = "service_instances.json";
pub const BINDINGS_FILE: &str = "service_bindings.json";

/// Byte-level sink for snapshots. Implementations must replace the previous
/// content of `path` entirely.
#[async_trait]
pub trait SnapshotWriter: Send + Sync {
    async fn write(&self, path: &Path, bytes: Vec<u8>) -> std::io::Result<()>;
}

/// Writes and fsyncs a temporary sibling, then renames it over the target,
/// so a reader sees either the old snapshot or the complete new one.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSnapshotWriter;

#[async_trait]
impl SnapshotWriter for FileSnapshotWriter {
    async fn write(&self, path: &Path, bytes: Vec<u8>) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let staged = async {
            let mut file = fs::File::create(&tmp).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            fs::rename(&tmp, path).await
        }
        .await;
        if staged.is_err() {
            let _ = fs::remove_file(&tmp).await;
        }
        staged
    }
}

/// Serializes id-keyed maps to JSON files under a base directory.
#[derive(Clone)]
pub struct PersistenceGateway {
    base_path: PathBuf,
    writer: Arc<dyn SnapshotWriter>,
}

impl PersistenceGateway {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self::with_writer(base_path, Arc::new(FileSnapshotWriter))
    }

    pub fn with_writer<P: Into<PathBuf>>(base_path: P, writer: Arc<dyn SnapshotWriter>) -> Self {
        Self { base_path: base_path.into(), writer }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Overwrite `<base>/<filename>` with the full contents of `map`.
    pub async fn persist<V>(&self, map: &HashMap<String, V>, filename: &str) -> Result<(), BrokerError>
    where
        V: Serialize + Sync,
    {
        let path = self.base_path.join(filename);
        let data = serde_json::to_vec_pretty(map).map_err(|e| BrokerError::Persistence(e.to_string()))?;
        self.writer.write(&path, data).await.map_err(|e| {
            error!(path = %path.display(), error = %e, "snapshot write failed");
            BrokerError::Persistence(format!("{}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), entries = map.len(), "snapshot written");
        Ok(())
    }

    /// Read a snapshot written by [`persist`](Self::persist). A missing file
    /// is an empty map; an unreadable or malformed one is an error.
    pub async fn load<V>(&self, filename: &str) -> Result<HashMap<String, V>, BrokerError>
    where
        V: DeserializeOwned,
    {
        let path = self.base_path.join(filename);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(BrokerError::Config(format!("cannot read {}: {e}", path.display()))),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| BrokerError::Config(format!("corrupt snapshot {}: {e}", path.display())))
    }
}
