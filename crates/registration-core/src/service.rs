//! Caller-facing registration operations.

use crate::error::{RegistrationError, RegistrationResult};
use crate::store::RegistrationStore;
use crate::types::StoredRecord;
use crate::validator::validate_registration;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Outcome category of an add request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AddStatus {
    Success,
    Duplicate,
    Invalid,
}

/// Structured result of an add request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddRegistrationResponse {
    pub status: AddStatus,
    /// Human-readable outcome or rejection reason.
    pub detail: String,
    /// Machine-readable rejection code (absent on success).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// The stored record (success only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<StoredRecord>,
}

impl AddRegistrationResponse {
    fn success(record: StoredRecord) -> Self {
        Self {
            status: AddStatus::Success,
            detail: format!("Registered {}", record.name),
            code: None,
            record: Some(record),
        }
    }

    fn rejected(status: AddStatus, error: &RegistrationError) -> Self {
        Self {
            status,
            detail: error.to_string(),
            code: Some(error.code().to_string()),
            record: None,
        }
    }
}

/// Validates raw input and drives the store.
pub struct RegistrationService {
    store: RegistrationStore,
}

impl RegistrationService {
    /// Create a service over a store.
    pub fn new(store: RegistrationStore) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &RegistrationStore {
        &self.store
    }

    /// Validate and store a registration.
    ///
    /// Rejections and duplicates are reported in the response; only a
    /// storage failure is returned as an error.
    pub fn add_registration(
        &self,
        name: &str,
        email: &str,
        dob: &str,
    ) -> RegistrationResult<AddRegistrationResponse> {
        let record = match validate_registration(name, email, dob) {
            Ok(r) => r,
            Err(e) => {
                info!(code = e.code(), "Registration rejected: {}", e);
                return Ok(AddRegistrationResponse::rejected(AddStatus::Invalid, &e));
            }
        };

        match self.store.add(record) {
            Ok(stored) => Ok(AddRegistrationResponse::success(stored)),
            Err(e @ RegistrationError::DuplicateEmail(_)) => {
                Ok(AddRegistrationResponse::rejected(AddStatus::Duplicate, &e))
            }
            Err(e) => {
                warn!(error = %e, "Failed to store registration");
                Err(e)
            }
        }
    }

    /// Every stored registration in insertion order.
    pub fn get_all_registrations(&self) -> RegistrationResult<Vec<StoredRecord>> {
        self.store.list_all()
    }

    /// Registrations whose name or email contains the query.
    pub fn search_registrations(&self, query: &str) -> RegistrationResult<Vec<StoredRecord>> {
        self.store.search(query)
    }
}
