//! Tool for registering a person.

use super::run_blocking;
use crate::error::ToolError;
use crate::types::{parse_arguments, Tool, ToolDefinition};
use async_trait::async_trait;
use registration_core::{AddStatus, DATE_FORMAT, RegistrationService, TIMESTAMP_FORMAT};
use serde::Deserialize;
use std::sync::Arc;

/// Adds a registration from name, email and date of birth.
pub struct AddRegistrationTool {
    service: Arc<RegistrationService>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AddRegistrationArgs {
    name: String,
    email: String,
    dob: String,
}

impl AddRegistrationTool {
    pub fn new(service: Arc<RegistrationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for AddRegistrationTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "add_registration",
            "Add a new user registration with name, email, and date of birth. Emails must be unique.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Full name of the person"
                    },
                    "email": {
                        "type": "string",
                        "description": "Email address"
                    },
                    "dob": {
                        "type": "string",
                        "description": "Date of birth in YYYY-MM-DD format"
                    }
                },
                "required": ["name", "email", "dob"]
            }),
        )
    }

    fn name(&self) -> &str {
        "add_registration"
    }

    /// The append cannot be recalled once started.
    fn cancel_safe(&self) -> bool {
        false
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: AddRegistrationArgs = parse_arguments(arguments)?;

        let service = self.service.clone();
        let response = run_blocking(move || {
            service.add_registration(&args.name, &args.email, &args.dob)
        })
        .await?;

        match (response.status, response.record) {
            (AddStatus::Success, Some(record)) => Ok(format!(
                "SUCCESS: {}\nName: {}\nEmail: {}\nDOB: {}\nRegistered: {}",
                response.detail,
                record.name,
                record.email,
                record.date_of_birth.format(DATE_FORMAT),
                record.registered_at.format(TIMESTAMP_FORMAT)
            )),
            (AddStatus::Duplicate, _) => Ok(format!("ERROR: {}", response.detail)),
            _ => Ok(format!("ERROR: Validation failed\n{}", response.detail)),
        }
    }
}
