//! Storage-layer error.

use thiserror::Error;

use flashstock_core::DomainError;

/// Error returned by the storage ports.
///
/// Infrastructure failures only; domain-level outcomes (insufficient
/// stock, lost CAS races) are expressed in the ports' return values, not
/// as errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// A unique-key constraint was violated (duplicate SKU or
    /// reservation id).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend failed (for the in-memory adapters: a poisoned lock).
    #[error("backend failure: {0}")]
    Backend(String),
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(msg) => DomainError::Conflict(msg),
            StorageError::Backend(msg) => DomainError::Storage(msg),
        }
    }
}
