//! Storage backend seam.
//!
//! The broker never talks to the shared filesystem itself; everything that
//! touches the backend goes through [`StorageClient`].

pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by the storage backend. The message is passed through
/// to callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self { Self(message.into()) }
}

/// Connection details a volume driver needs to reach the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDetails {
    /// Metadata server endpoint descriptor.
    pub mds: String,
    /// Access credential.
    pub keyring: String,
}

#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn is_filesystem_mounted(&self) -> bool;
    /// Mount the shared filesystem at `path`, returning the mountpoint.
    async fn mount_filesystem(&self, path: &str) -> Result<String, BackendError>;
    /// Create a share named `share`, returning its mountpoint.
    async fn create_share(&self, share: &str) -> Result<String, BackendError>;
    async fn delete_share(&self, share: &str) -> Result<(), BackendError>;
    /// Remote path of an existing share.
    async fn path_for_share(&self, share: &str) -> Result<String, BackendError>;
    async fn config_details(&self) -> Result<ConfigDetails, BackendError>;
}
