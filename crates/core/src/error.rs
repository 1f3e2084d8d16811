//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// `InsufficientStock` and `Gone` are expected, frequent outcomes of the
/// reservation flow — callers should treat them as ordinary answers, not
/// faults. `Storage` is the one infrastructure leak: a backend failed in a
/// way the coordinator cannot absorb.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found (unknown SKU or reservation).
    #[error("not found")]
    NotFound,

    /// Ownership mismatch: the reservation belongs to another requester.
    #[error("forbidden")]
    Forbidden,

    /// Not enough stock to satisfy the request. Carries what the caller
    /// asked for and what was observed available, so it can decide whether
    /// to retry with a smaller quantity.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// A state-transition precondition failed (concurrent mutation,
    /// cancel-after-confirm, confirm-after-cancel).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The reservation's hold has expired.
    #[error("reservation has expired")]
    Gone,

    /// The storage backend failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
