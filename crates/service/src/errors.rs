use models::errors::ModelError;
use thiserror::Error;

use crate::client::BackendError;

#[derive(Debug, Error)]
pub enum BrokerError {
    /// Mount, share or config call against the storage backend failed.
    #[error(transparent)]
    BackendUnavailable(#[from] BackendError),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("{0}")]
    NotFound(String),
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] ModelError),
    #[error("config error: {0}")]
    Config(String),
}

impl BrokerError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            BrokerError::InvalidParameters(_) => 1001,
            BrokerError::NotFound(_) => 1003,
            BrokerError::BackendUnavailable(_) => 1101,
            BrokerError::Persistence(_) => 1200,
            BrokerError::Config(_) => 1300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_is_surfaced_verbatim() {
        let err: BrokerError = BackendError::new("mds unreachable").into();
        assert_eq!(err.to_string(), "mds unreachable");
        assert_eq!(err.code(), 1101);
    }

    #[test]
    fn not_found_reads_naturally() {
        let err = BrokerError::not_found("binding");
        assert_eq!(err.to_string(), "binding not found");
        assert_eq!(err.code(), 1003);
    }
}
