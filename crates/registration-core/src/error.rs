//! Registration errors.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors produced while validating or storing a registration.
///
/// Everything except [`RegistrationError::StorageUnavailable`] is a
/// recoverable rejection that should be reported back to the caller.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Invalid date format '{0}'. Use YYYY-MM-DD")]
    InvalidDateFormat(String),

    #[error("Date of birth {0} cannot be today or in the future")]
    FutureDate(NaiveDate),

    #[error("Date of birth {0} is more than 150 years ago")]
    DateTooOld(NaiveDate),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl RegistrationError {
    /// Whether this error rejects the input rather than failing the operation.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, RegistrationError::StorageUnavailable(_))
    }

    /// Whether this error comes from field validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RegistrationError::InvalidName(_)
                | RegistrationError::InvalidEmail(_)
                | RegistrationError::InvalidDateFormat(_)
                | RegistrationError::FutureDate(_)
                | RegistrationError::DateTooOld(_)
        )
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            RegistrationError::InvalidName(_) => "INVALID_NAME",
            RegistrationError::InvalidEmail(_) => "INVALID_EMAIL",
            RegistrationError::InvalidDateFormat(_) => "INVALID_DATE_FORMAT",
            RegistrationError::FutureDate(_) => "FUTURE_DATE",
            RegistrationError::DateTooOld(_) => "DATE_TOO_OLD",
            RegistrationError::DuplicateEmail(_) => "DUPLICATE_EMAIL",
            RegistrationError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
        }
    }
}

impl From<std::io::Error> for RegistrationError {
    fn from(e: std::io::Error) -> Self {
        RegistrationError::StorageUnavailable(e.to_string())
    }
}

impl From<csv::Error> for RegistrationError {
    fn from(e: csv::Error) -> Self {
        RegistrationError::StorageUnavailable(format!("CSV error: {}", e))
    }
}

/// Result type alias for registration operations.
pub type RegistrationResult<T> = Result<T, RegistrationError>;
