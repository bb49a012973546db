//! Tool for searching registrations by name or email.

use super::{format_records, run_blocking};
use crate::error::ToolError;
use crate::types::{parse_arguments, Tool, ToolDefinition};
use async_trait::async_trait;
use registration_core::RegistrationService;
use serde::Deserialize;
use std::sync::Arc;

/// Case-insensitive substring search over names and emails.
pub struct SearchRegistrationsTool {
    service: Arc<RegistrationService>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchArgs {
    query: String,
}

impl SearchRegistrationsTool {
    pub fn new(service: Arc<RegistrationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SearchRegistrationsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "search_registrations",
            "Search registrations whose name or email contains the query (case-insensitive)",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Part of a name or email address (e.g., 'smith', 'example.com')"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    fn name(&self) -> &str {
        "search_registrations"
    }

    /// The listing must reach the model complete.
    fn truncate_output(&self) -> bool {
        false
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: SearchArgs = parse_arguments(arguments)?;
        let query = args.query.trim().to_string();

        let service = self.service.clone();
        let lookup = query.clone();
        let records = run_blocking(move || service.search_registrations(&lookup)).await?;

        if records.is_empty() {
            return Ok(format!("No registrations match '{}'.", query));
        }
        Ok(format_records(
            &format!("{} registration(s) matching '{}':", records.len(), query),
            &records,
        ))
    }
}
