//! In-memory storage client for tests and doc examples.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{BackendError, ConfigDetails, StorageClient};

pub const MOCK_SHARE_ROOT: &str = "/volumes";
pub const MOCK_MDS: &str = "10.0.0.1:6789";
pub const MOCK_KEYRING: &str = "AQBmock==";

/// Backend operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    Mount,
    CreateShare,
    DeleteShare,
    PathForShare,
    ConfigDetails,
}

#[derive(Default)]
struct MockState {
    mounted: bool,
    mount_calls: Vec<String>,
    shares: BTreeMap<String, String>,
    failing: HashSet<MockOp>,
}

#[derive(Default)]
pub struct MockStorageClient {
    state: Mutex<MockState>,
}

impl MockStorageClient {
    pub fn new() -> Self { Self::default() }

    /// Start with the shared filesystem already mounted.
    pub fn mounted() -> Self {
        let client = Self::default();
        client.lock().mounted = true;
        client
    }

    pub fn fail_on(&self, op: MockOp) {
        self.lock().failing.insert(op);
    }

    pub fn clear_failures(&self) {
        self.lock().failing.clear();
    }

    pub fn is_mounted(&self) -> bool { self.lock().mounted }

    pub fn mount_calls(&self) -> Vec<String> { self.lock().mount_calls.clone() }

    pub fn has_share(&self, share: &str) -> bool { self.lock().shares.contains_key(share) }

    pub fn share_names(&self) -> Vec<String> { self.lock().shares.keys().cloned().collect() }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(state: &MockState, op: MockOp) -> Result<(), BackendError> {
        if state.failing.contains(&op) {
            return Err(BackendError::new(format!("injected {op:?} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageClient for MockStorageClient {
    async fn is_filesystem_mounted(&self) -> bool { self.lock().mounted }

    async fn mount_filesystem(&self, path: &str) -> Result<String, BackendError> {
        let mut state = self.lock();
        Self::check(&state, MockOp::Mount)?;
        state.mount_calls.push(path.to_string());
        state.mounted = true;
        Ok(path.to_string())
    }

    async fn create_share(&self, share: &str) -> Result<String, BackendError> {
        let mut state = self.lock();
        Self::check(&state, MockOp::CreateShare)?;
        if !state.mounted {
            return Err(BackendError::new("filesystem not mounted"));
        }
        let path = format!("{MOCK_SHARE_ROOT}/{share}");
        state.shares.insert(share.to_string(), path.clone());
        Ok(path)
    }

    async fn delete_share(&self, share: &str) -> Result<(), BackendError> {
        let mut state = self.lock();
        Self::check(&state, MockOp::DeleteShare)?;
        state
            .shares
            .remove(share)
            .map(|_| ())
            .ok_or_else(|| BackendError::new(format!("share {share} does not exist")))
    }

    async fn path_for_share(&self, share: &str) -> Result<String, BackendError> {
        let state = self.lock();
        Self::check(&state, MockOp::PathForShare)?;
        state
            .shares
            .get(share)
            .cloned()
            .ok_or_else(|| BackendError::new(format!("share {share} does not exist")))
    }

    async fn config_details(&self) -> Result<ConfigDetails, BackendError> {
        let state = self.lock();
        Self::check(&state, MockOp::ConfigDetails)?;
        Ok(ConfigDetails { mds: MOCK_MDS.to_string(), keyring: MOCK_KEYRING.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn share_lifecycle_and_injection() {
        let client = MockStorageClient::new();
        assert!(!client.is_filesystem_mounted().await);
        assert!(client.create_share("x").await.is_err(), "needs a mount first");

        client.mount_filesystem("/").await.unwrap();
        assert!(client.is_mounted());
        assert_eq!(client.create_share("x").await.unwrap(), "/volumes/x");
        client.create_share("a").await.unwrap();
        assert_eq!(client.share_names(), vec!["a".to_string(), "x".to_string()]);
        assert_eq!(client.path_for_share("x").await.unwrap(), "/volumes/x");

        client.fail_on(MockOp::DeleteShare);
        assert!(client.delete_share("x").await.is_err());
        assert!(client.has_share("x"));

        client.clear_failures();
        client.delete_share("x").await.unwrap();
        assert!(client.path_for_share("x").await.is_err());
        assert_eq!(client.share_names(), vec!["a".to_string()]);
    }
}
