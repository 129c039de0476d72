//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// missing records, stock invariants). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input was missing or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced record does not exist. Carries the kind of record.
    #[error("{0} not found")]
    NotFound(String),

    /// A quantity argument or result would break `quantity >= 0`.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A removal asked for more units than are in stock.
    #[error("not enough items in stock (available: {available}, requested: {requested})")]
    InsufficientStock { available: i64, requested: i64 },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn insufficient_stock(available: i64, requested: i64) -> Self {
        Self::InsufficientStock { available, requested }
    }
}
