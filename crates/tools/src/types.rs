//! Tool type definitions following the OpenAI function calling schema.

use crate::error::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Tool definition sent to the LLM.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// Always "function".
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

impl ToolDefinition {
    /// Build a function tool definition.
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: "function".into(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Function definition within a tool.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    /// Function name (e.g., "add_registration").
    pub name: String,
    pub description: String,
    /// JSON Schema for parameters.
    pub parameters: serde_json::Value,
}

/// Tool call requested by the LLM.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolCall {
    pub id: String,
    /// Always "function".
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

impl ToolCall {
    /// Build a function call.
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            call_type: "function".into(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// Function call details.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON string of arguments.
    pub arguments: String,
}

/// Result of executing a tool.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// ID of the tool call this responds to.
    pub tool_call_id: String,
    /// Result content (or error message).
    pub content: String,
    pub success: bool,
}

impl ToolResult {
    pub fn success(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
            success: true,
        }
    }

    pub fn error(tool_call_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: message.into(),
            success: false,
        }
    }
}

/// Trait for implementing tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Definition advertised to the LLM.
    fn definition(&self) -> ToolDefinition;

    fn name(&self) -> &str;

    /// Whether the executor may cut long output to its response limit.
    fn truncate_output(&self) -> bool {
        true
    }

    /// Whether the call can be abandoned on timeout without leaving side effects.
    ///
    /// Tools returning `false` always run to completion.
    fn cancel_safe(&self) -> bool {
        true
    }

    /// Execute the tool with JSON arguments.
    async fn execute(&self, arguments: &str) -> Result<String, ToolError>;
}

/// Parse a tool's JSON arguments, mapping failures to `InvalidArguments`.
pub fn parse_arguments<T: serde::de::DeserializeOwned>(arguments: &str) -> Result<T, ToolError> {
    // Some models send an empty string for parameterless calls
    let arguments = if arguments.trim().is_empty() { "{}" } else { arguments };
    serde_json::from_str(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}
