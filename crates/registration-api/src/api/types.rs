//! API request and response types.

use registration_core::StoredRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request to add a registration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddRegistrationRequest {
    pub name: String,
    pub email: String,
    /// Date of birth, YYYY-MM-DD
    pub dob: String,
}

/// Query parameters for searching registrations.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

/// List of registrations.
#[derive(Debug, Serialize)]
pub struct RegistrationsResponse {
    pub registrations: Vec<StoredRecord>,
    pub total: usize,
}

impl From<Vec<StoredRecord>> for RegistrationsResponse {
    fn from(registrations: Vec<StoredRecord>) -> Self {
        let total = registrations.len();
        Self {
            registrations,
            total,
        }
    }
}

/// Service information.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub registrations: usize,
}
