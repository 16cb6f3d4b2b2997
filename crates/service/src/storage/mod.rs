//! Broker state: the in-memory lifecycle maps and the gateway that writes
//! them to disk after every mutation.

pub mod lifecycle;
pub mod persistence;

pub use lifecycle::LifecycleStore;
pub use persistence::{FileSnapshotWriter, PersistenceGateway, SnapshotWriter, BINDINGS_FILE, INSTANCES_FILE};
