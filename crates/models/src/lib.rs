//! Broker domain records: service instances, bindings, the catalog and the
//! mount descriptors handed back on bind.

pub mod errors;
pub mod parameters;
pub mod instance;
pub mod binding;
pub mod catalog;
pub mod volume;

pub use binding::ServiceBinding;
pub use instance::{LastOperation, ServiceInstance};
pub use parameters::Parameters;
