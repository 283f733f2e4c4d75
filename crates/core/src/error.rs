//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every failure here is deterministic and detected before any output is
/// produced. Callers usually treat these as a contract violation by the
/// upstream authentication subsystem.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation at construction time (e.g. empty username).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An authentication record is malformed or internally inconsistent.
    #[error("invalid authentication record: {0}")]
    InvalidRecord(String),

    /// A mandatory field of an authentication record is missing.
    ///
    /// This is the specialization of [`DomainError::InvalidRecord`] used when
    /// the record is inconsistent because something is absent.
    #[error("invalid authentication record: missing field '{0}'")]
    MissingField(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// True for every kind of invalid record, including missing fields.
    pub fn is_invalid_record(&self) -> bool {
        matches!(self, Self::InvalidRecord(_) | Self::MissingField(_))
    }
}
