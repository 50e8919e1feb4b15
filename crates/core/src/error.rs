//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A movement quantity was zero or negative.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,

    /// An outbound movement exceeded the available stock.
    #[error("insufficient stock: {available} available")]
    InsufficientStock {
        /// Quantity on hand at the time the movement was rejected.
        available: i64,
    },

    /// A conflict occurred (e.g. duplicate SKU on product creation).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_quantity(quantity: i64) -> Self {
        Self::InvalidQuantity(quantity)
    }

    pub fn insufficient_stock(available: i64) -> Self {
        Self::InsufficientStock { available }
    }
}
