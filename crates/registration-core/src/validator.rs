//! Field validation for registrations.
//!
//! All functions are pure apart from reading the local date; the `_at`
//! variants take the reference date explicitly.

use crate::error::{RegistrationError, RegistrationResult};
use crate::types::{Email, Name, ValidRecord, DATE_FORMAT};
use chrono::{Local, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum trimmed name length, in characters.
pub const MIN_NAME_LEN: usize = 2;

/// Maximum trimmed name length, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Oldest accepted date of birth, in years before today.
pub const MAX_AGE_YEARS: u32 = 150;

// local@domain.tld with no whitespace anywhere
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Failed to compile email regex")
});

/// Trim a name and check its length.
pub fn validate_name(raw: &str) -> RegistrationResult<Name> {
    let name = raw.trim();
    let len = name.chars().count();

    if len < MIN_NAME_LEN {
        return Err(RegistrationError::InvalidName(format!(
            "must be at least {} characters long",
            MIN_NAME_LEN
        )));
    }

    if len > MAX_NAME_LEN {
        return Err(RegistrationError::InvalidName(format!(
            "must be at most {} characters long",
            MAX_NAME_LEN
        )));
    }

    Ok(Name::new_unchecked(name.to_string()))
}

/// Trim and lower-case an email, then check its shape.
pub fn validate_email(raw: &str) -> RegistrationResult<Email> {
    let email = raw.trim().to_lowercase();

    if !EMAIL_REGEX.is_match(&email) {
        return Err(RegistrationError::InvalidEmail(raw.trim().to_string()));
    }

    Ok(Email::new_unchecked(email))
}

/// Parse a `YYYY-MM-DD` date of birth relative to the local date.
pub fn validate_dob(raw: &str) -> RegistrationResult<NaiveDate> {
    validate_dob_at(raw, Local::now().date_naive())
}

/// Parse a `YYYY-MM-DD` date of birth relative to `today`.
///
/// The date must be strictly before `today` and not earlier than
/// `today` minus [`MAX_AGE_YEARS`].
pub fn validate_dob_at(raw: &str, today: NaiveDate) -> RegistrationResult<NaiveDate> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| RegistrationError::InvalidDateFormat(raw.to_string()))?;

    if date >= today {
        return Err(RegistrationError::FutureDate(date));
    }

    let oldest = today
        .checked_sub_months(Months::new(MAX_AGE_YEARS * 12))
        .unwrap_or(NaiveDate::MIN);
    if date < oldest {
        return Err(RegistrationError::DateTooOld(date));
    }

    Ok(date)
}

/// Validate name, email and date of birth in that order.
///
/// Returns the first rejection encountered.
pub fn validate_registration(name: &str, email: &str, dob: &str) -> RegistrationResult<ValidRecord> {
    validate_registration_at(name, email, dob, Local::now().date_naive())
}

/// Same as [`validate_registration`] with an explicit reference date.
pub fn validate_registration_at(
    name: &str,
    email: &str,
    dob: &str,
    today: NaiveDate,
) -> RegistrationResult<ValidRecord> {
    let name = validate_name(name)?;
    let email = validate_email(email)?;
    let date_of_birth = validate_dob_at(dob, today)?;

    Ok(ValidRecord::new(name, email, date_of_birth))
}
