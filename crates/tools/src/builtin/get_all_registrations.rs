//! Tool for listing every registration.

use super::{format_records, run_blocking};
use crate::error::ToolError;
use crate::types::{parse_arguments, Tool, ToolDefinition};
use async_trait::async_trait;
use registration_core::RegistrationService;
use serde::Deserialize;
use std::sync::Arc;

/// Lists all registrations in insertion order.
pub struct GetAllRegistrationsTool {
    service: Arc<RegistrationService>,
}

#[derive(Deserialize)]
struct NoArgs {}

impl GetAllRegistrationsTool {
    pub fn new(service: Arc<RegistrationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetAllRegistrationsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "get_all_registrations",
            "Get all user registrations",
            serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        )
    }

    fn name(&self) -> &str {
        "get_all_registrations"
    }

    /// The listing must reach the model complete.
    fn truncate_output(&self) -> bool {
        false
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let _: NoArgs = parse_arguments(arguments)?;

        let service = self.service.clone();
        let records = run_blocking(move || service.get_all_registrations()).await?;

        if records.is_empty() {
            return Ok("No registrations found.".into());
        }
        Ok(format_records("All Registrations:", &records))
    }
}
