//! Tool registry for managing available tools.

use crate::types::{Tool, ToolDefinition};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Registry of available tools.
///
/// Definitions are reported in registration order so the LLM sees a
/// stable tool list across requests.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
    enabled: HashSet<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
            enabled: HashSet::new(),
        }
    }

    /// Register a tool (enabled by default). Re-registering a name replaces it.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name.clone());
        }
        self.enabled.insert(name);
    }

    pub fn enable(&mut self, name: &str) {
        if self.tools.contains_key(name) {
            self.enabled.insert(name.to_string());
        }
    }

    pub fn disable(&mut self, name: &str) {
        self.enabled.remove(name);
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    /// Definitions for all enabled tools.
    pub fn get_definitions(&self) -> Vec<ToolDefinition> {
        self.list_enabled()
            .into_iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.definition())
            .collect()
    }

    /// Get a tool by name (only if enabled).
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        if self.enabled.contains(name) {
            self.tools.get(name).cloned()
        } else {
            None
        }
    }

    /// All registered tool names, in registration order.
    pub fn list_tools(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Enabled tool names, in registration order.
    pub fn list_enabled(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|name| self.enabled.contains(*name))
            .map(|s| s.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use async_trait::async_trait;

    struct EchoTool {
        name: String,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::function(self.name.clone(), "Echo tool", serde_json::json!({}))
        }

        fn name(&self) -> &str {
            &self.name
        }

        async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
            Ok(arguments.to_string())
        }
    }

    fn echo(name: &str) -> Arc<dyn Tool> {
        Arc::new(EchoTool { name: name.into() })
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());
        registry.register(echo("add_registration"));

        assert!(registry.get_tool("add_registration").is_some());
        assert!(registry.is_enabled("add_registration"));
        assert!(registry.get_tool("missing").is_none());
    }

    #[test]
    fn test_disable_and_enable() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("add_registration"));

        registry.disable("add_registration");
        assert!(registry.get_tool("add_registration").is_none());
        assert!(!registry.is_enabled("add_registration"));

        registry.enable("add_registration");
        assert!(registry.get_tool("add_registration").is_some());

        // Unknown names are ignored
        registry.enable("missing");
        assert!(!registry.is_enabled("missing"));
    }

    #[test]
    fn test_definitions_follow_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("add_registration"));
        registry.register(echo("get_all_registrations"));
        registry.register(echo("search_registrations"));
        registry.disable("get_all_registrations");

        let names: Vec<_> = registry
            .get_definitions()
            .into_iter()
            .map(|d| d.function.name)
            .collect();
        assert_eq!(names, vec!["add_registration", "search_registrations"]);
        assert_eq!(
            registry.list_tools(),
            vec!["add_registration", "get_all_registrations", "search_registrations"]
        );
    }

    #[test]
    fn test_reregister_keeps_single_entry() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("add_registration"));
        registry.register(echo("add_registration"));

        assert_eq!(registry.list_tools(), vec!["add_registration"]);
        assert_eq!(registry.get_definitions().len(), 1);
    }
}
