//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Storage failures belong to the repository layer.
///
/// Validation messages are user-facing and shown verbatim by the frontend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a required field is blank).
    #[error("{0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found.
    #[error("not found")]
    NotFound,

    /// A uniqueness rule was violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}

/// Fail with a validation error when `value` is blank.
pub fn require_text(value: &str, message: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(message));
    }
    Ok(())
}

/// Fail with a validation error when a sequence number is below 1.
pub fn require_positive_number(number: u32, message: &str) -> DomainResult<()> {
    if number < 1 {
        return Err(DomainError::validation(message));
    }
    Ok(())
}

/// Fail with a validation error when the company reference is missing (nil).
pub fn require_company(company_id: crate::CompanyId, message: &str) -> DomainResult<()> {
    if company_id.as_uuid().is_nil() {
        return Err(DomainError::validation(message));
    }
    Ok(())
}
