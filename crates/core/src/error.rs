//! Domain error model.

use thiserror::Error;

use crate::id::LocationId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// lookups, capacity, id conflicts). File and serialization concerns belong to
/// the interchange layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed product or location).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A location or product lookup missed.
    #[error("not found: {0}")]
    NotFound(String),

    /// A destination lacks the free volume needed for an item or batch.
    #[error("capacity exceeded at location {location}: required {required:.1}, free {free:.1}")]
    CapacityExceeded {
        location: LocationId,
        required: f64,
        free: f64,
    },

    /// An identifier is already in use.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn capacity_exceeded(location: LocationId, required: f64, free: f64) -> Self {
        Self::CapacityExceeded {
            location,
            required,
            free,
        }
    }

    /// `true` for conditions callers treat as an expected outcome rather than a fault.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}
