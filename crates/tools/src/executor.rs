//! Tool executor with timeout and error handling.

use crate::error::ToolError;
use crate::registry::ToolRegistry;
use crate::types::{ToolCall, ToolResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Executor for running tools with safety limits.
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    timeout: Duration,
    max_response_len: usize,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: Duration::from_secs(10),
            max_response_len: 4000,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set maximum response length in bytes.
    pub fn with_max_response_len(mut self, len: usize) -> Self {
        self.max_response_len = len;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Execute a tool call. Failures are reported in the result, never raised.
    pub async fn execute(&self, tool_call: &ToolCall) -> ToolResult {
        let tool_name = &tool_call.function.name;
        info!(tool = %tool_name, "Executing tool");

        let tool = match self.registry.get_tool(tool_name) {
            Some(t) => t,
            None => {
                warn!(tool = %tool_name, "Tool not found or disabled");
                return ToolResult::error(
                    &tool_call.id,
                    format!("Tool '{}' not available", tool_name),
                );
            }
        };

        let arguments = &tool_call.function.arguments;
        let result = if tool.cancel_safe() {
            match timeout(self.timeout, tool.execute(arguments)).await {
                Ok(result) => result,
                Err(_) => {
                    error!(tool = %tool_name, timeout = ?self.timeout, "Tool timed out");
                    return ToolResult::error(
                        &tool_call.id,
                        ToolError::Timeout(self.timeout.as_secs()).to_string(),
                    );
                }
            }
        } else {
            // Abandoning it could leave a write behind that the model never hears about
            tool.execute(arguments).await
        };

        match result {
            Ok(content) => {
                let content = if tool.truncate_output() {
                    truncate(content, self.max_response_len)
                } else {
                    content
                };
                info!(tool = %tool_name, len = content.len(), "Tool executed successfully");
                ToolResult::success(&tool_call.id, content)
            }
            Err(e) => {
                error!(tool = %tool_name, error = %e, "Tool execution failed");
                ToolResult::error(&tool_call.id, format!("Error: {}", e))
            }
        }
    }
}

/// Cut `content` to at most `max_len` bytes on a character boundary.
fn truncate(content: String, max_len: usize) -> String {
    if content.len() <= max_len {
        return content;
    }

    let mut end = max_len;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    format!(
        "{}... [truncated, {} chars total]",
        &content[..end],
        content.chars().count()
    )
}
