//! Shared process plumbing for the broker binaries: logging setup and
//! filesystem sanity checks.

pub mod utils;
pub mod env;
