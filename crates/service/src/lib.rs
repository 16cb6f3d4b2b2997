//! Provisioning core of the share broker.
//! - Tracks service instances and bindings in a lifecycle store.
//! - Drives the storage backend through the `StorageClient` seam.
//! - Snapshots both maps to disk after every mutation.

pub mod errors;
pub mod client;
pub mod storage;
pub mod settings;
pub mod catalog;
pub mod provisioning;
pub mod binding;
pub mod controller;

pub use controller::{BrokerController, Controller};
pub use errors::BrokerError;
