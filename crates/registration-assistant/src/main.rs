//! Registration Assistant - Main entry point.

mod assistant;
mod commands;
mod config;
mod error;
mod history;

use crate::assistant::{Assistant, Reply};
use crate::commands::{Input, HELP_TEXT, INTERRUPTED_TEXT};
use crate::config::Config;
use crate::error::AppResult;
use anyhow::Context;
use llm_client::LlmClient;
use registration_core::{RegistrationService, RegistrationStore};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tools::{builtin::register_registration_tools, ToolExecutor, ToolRegistry};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.assistant.log_level);

    info!("Starting registration assistant...");

    // Initialize clients
    let llm = Arc::new(
        LlmClient::new(
            config.llm.api_key.expose_secret().as_str(),
            config.llm.base_url.as_str(),
            config.llm.model.as_str(),
            config.llm.timeout,
        )
        .context("Failed to create LLM client")?,
    );

    if llm.health_check().await {
        info!("LLM healthy - Model: {}", config.llm.model);
    } else {
        warn!("LLM health check failed - will retry on requests");
    }

    // Initialize storage and tools
    let store = RegistrationStore::new(config.storage.path.clone());
    info!(path = %store.path().display(), "Using registration file");
    let service = Arc::new(RegistrationService::new(store));

    let mut registry = ToolRegistry::new();
    register_registration_tools(&mut registry, service);
    info!("Registered {} tools: {:?}", registry.list_tools().len(), registry.list_tools());

    let executor = ToolExecutor::new(Arc::new(registry)).with_timeout(config.assistant.tool_timeout);
    let mut assistant = Assistant::new(llm, executor, &config.assistant);

    println!("{}", HELP_TEXT);
    run(&mut assistant).await?;

    info!("Registration assistant stopped");
    Ok(())
}

/// Read lines from stdin until `/quit`, end of input or Ctrl-C.
async fn run(assistant: &mut Assistant) -> AppResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = signal::ctrl_c() => {
                println!();
                info!("Received shutdown signal");
                return Ok(());
            }
        };

        // End of input
        let Some(line) = line else {
            println!();
            return Ok(());
        };

        match Input::parse(&line) {
            Input::Quit => return Ok(()),
            Input::Clear => {
                let count = assistant.history_len();
                assistant.clear();
                println!("Conversation cleared ({} messages).", count);
            }
            Input::Unknown(command) => {
                println!("Unknown command: {}\n{}", command, HELP_TEXT);
            }
            Input::Empty => {}
            Input::Message(text) => {
                let reply = tokio::select! {
                    reply = assistant.respond(text) => reply,
                    _ = signal::ctrl_c() => {
                        // A registration already handed to the store still completes
                        println!("\n{}", INTERRUPTED_TEXT);
                        info!("Received shutdown signal during a request");
                        return Ok(());
                    }
                };
                print_reply(&reply);
            }
        }
    }
}

fn print_reply(reply: &Reply) {
    for tool in &reply.tools_used {
        println!("[used {}]", tool);
    }
    println!("{}\n", reply.text);
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so they do not interleave with the conversation
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
