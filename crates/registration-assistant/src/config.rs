//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use registration_core::DEFAULT_STORE_PATH;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Registration storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Assistant behaviour
    #[serde(default)]
    pub assistant: AssistantConfig,
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    /// API key for the chat completions endpoint
    pub api_key: SecretString,

    /// API base URL
    #[serde(default = "default_llm_url")]
    pub base_url: String,

    /// Chat model
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the registrations CSV file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// System prompt for the LLM
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Maximum LLM round trips per user message
    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: usize,

    /// Timeout for a single tool execution
    #[serde(default = "default_tool_timeout", with = "humantime_serde")]
    pub tool_timeout: Duration,

    /// Max messages kept in history (older messages are trimmed)
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            max_tool_iterations: default_max_tool_iterations(),
            tool_timeout: default_tool_timeout(),
            max_history: default_max_history(),
            log_level: default_log_level(),
        }
    }
}

// Default value functions
fn default_llm_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

fn default_max_tool_iterations() -> usize {
    5
}

fn default_tool_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_max_history() -> usize {
    50
}

fn default_log_level() -> String {
    "info".into()
}

fn default_system_prompt() -> String {
    r#"You are a registration assistant. You can:
- Register people with their name, email and date of birth
- Show every registered person
- Search registrations by name or email

## Registering
- Ask for any of name, email and date of birth that is missing
- Dates of birth use the YYYY-MM-DD format
- Let the add_registration tool validate the details and report its answer faithfully
- If a registration is rejected, explain why and ask for corrected details

## Listing
- Present registrations in a clear, readable list
- Never invent registrations that the tools did not return"#
        .into()
}

/// Append the current local date so the model can reason about ages.
pub fn build_system_prompt(base_prompt: &str) -> String {
    format!(
        "{}\n\nToday's date: {}",
        base_prompt,
        chrono::Local::now().format("%Y-%m-%d")
    )
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(false),
        )
    }

    fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
