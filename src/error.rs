//! Error types for form editing and NIT validation

use thiserror::Error;

/// Recoverable failures raised by the form core.
///
/// None of these leave state half-applied: the operation that produced the
/// error simply did not happen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("NIT must contain only digits, 1 to 15 of them (got {0:?})")]
    InvalidFormat(String),

    #[error("Please enter a form name")]
    EmptyName,

    #[error("Form must have at least one field")]
    NoFields,

    #[error("Field '{field}' does not allow changing its {attribute}")]
    LockedAttribute {
        field: String,
        attribute: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, FormError>;
