//! Registration record types.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column order of the registrations file.
pub const CSV_HEADER: [&str; 4] = ["Name", "Email", "Date_of_Birth", "Registration_Date"];

/// Format of the date of birth column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of the registration timestamp column (local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A trimmed name between 2 and 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(String);

impl Name {
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A trimmed, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registration whose fields all passed validation.
///
/// Only the validator can build one, so the store never sees raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRecord {
    name: Name,
    email: Email,
    date_of_birth: NaiveDate,
}

impl ValidRecord {
    pub(crate) fn new(name: Name, email: Email, date_of_birth: NaiveDate) -> Self {
        Self {
            name,
            email,
            date_of_birth,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }
}

/// A registration as persisted, including its server-assigned timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoredRecord {
    pub name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    #[serde(with = "timestamp")]
    pub registered_at: NaiveDateTime,
}

impl StoredRecord {
    pub(crate) fn from_valid(record: ValidRecord, registered_at: NaiveDateTime) -> Self {
        Self {
            name: record.name.0,
            email: record.email.0,
            date_of_birth: record.date_of_birth,
            registered_at,
        }
    }

    /// One-line summary: `name | email | dob | registered_at`.
    pub fn summary(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.email,
            self.date_of_birth.format(DATE_FORMAT),
            self.registered_at.format(TIMESTAMP_FORMAT)
        )
    }
}

/// Serde adapter for registration timestamps in [`TIMESTAMP_FORMAT`].
pub mod timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(de::Error::custom)
    }
}
