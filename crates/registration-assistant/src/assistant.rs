//! Chat loop - proxies user messages to the LLM and runs the tools it asks for.

use crate::config::{build_system_prompt, AssistantConfig};
use crate::history::Conversation;
use llm_client::{FunctionDefinitionApi, LlmClient, LlmError, ToolDefinition as LlmToolDefinition};
use std::sync::Arc;
use tools::{FunctionCall as ToolsFunctionCall, ToolCall as ToolsToolCall, ToolExecutor};
use tracing::{debug, error, info, instrument, warn};

/// The assistant's answer to one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    /// Names of the tools executed while producing the answer, in order.
    pub tools_used: Vec<String>,
}

impl Reply {
    fn new(text: impl Into<String>, tools_used: Vec<String>) -> Self {
        Self {
            text: text.into(),
            tools_used,
        }
    }
}

pub struct Assistant {
    llm: Arc<LlmClient>,
    executor: ToolExecutor,
    tools: Vec<LlmToolDefinition>,
    conversation: Conversation,
    system_prompt: String,
    max_tool_iterations: usize,
}

impl Assistant {
    pub fn new(llm: Arc<LlmClient>, executor: ToolExecutor, config: &AssistantConfig) -> Self {
        // Convert tool definitions to the LLM client's format once
        let tools = executor
            .registry()
            .get_definitions()
            .into_iter()
            .map(|d| LlmToolDefinition {
                tool_type: d.tool_type,
                function: FunctionDefinitionApi {
                    name: d.function.name,
                    description: d.function.description,
                    parameters: d.function.parameters,
                },
            })
            .collect();

        Self {
            llm,
            executor,
            tools,
            conversation: Conversation::new(config.max_history),
            system_prompt: config.system_prompt.clone(),
            max_tool_iterations: config.max_tool_iterations,
        }
    }

    /// Forget the conversation so far.
    pub fn clear(&mut self) {
        if !self.conversation.is_empty() {
            info!("Clearing {} messages", self.conversation.len());
            self.conversation.clear();
        }
    }

    pub fn history_len(&self) -> usize {
        self.conversation.len()
    }

    /// Answer one user message, running tool calls until the model replies with text.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn respond(&mut self, text: &str) -> Reply {
        self.conversation.add_user(text);

        let system_prompt = build_system_prompt(&self.system_prompt);
        let mut tools_used = Vec::new();
        // Only offer tools until they have run once, then force a text answer
        let mut tools_executed = false;

        for iteration in 0..self.max_tool_iterations {
            debug!("Tool execution loop iteration {}, tools_executed={}", iteration, tools_executed);

            let messages = self.conversation.to_messages(&system_prompt);
            let tools_to_offer = if !tools_executed && !self.tools.is_empty() {
                Some(&self.tools[..])
            } else {
                None
            };

            let response = match self
                .llm
                .chat_with_retry(&messages, Some(0.7), None, tools_to_offer, None)
                .await
            {
                Ok(r) => r,
                Err(LlmError::RateLimit) => {
                    return Reply::new(
                        "I'm receiving too many requests. Please wait a moment and try again.",
                        tools_used,
                    );
                }
                Err(LlmError::EmptyResponse) => {
                    error!("LLM returned empty response");
                    return Reply::new(
                        "The AI service returned an empty response. Please try rephrasing your message.",
                        tools_used,
                    );
                }
                Err(e) => {
                    error!("LLM error: {}", e);
                    return Reply::new(
                        "Sorry, I encountered an error connecting to the AI service. Please try again.",
                        tools_used,
                    );
                }
            };

            if let Some(usage) = response.usage {
                debug!(
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    finish_reason = %response.finish_reason,
                    "Completion received"
                );
            }

            match response.tool_calls {
                Some(tool_calls) if !tool_calls.is_empty() => {
                    debug!("LLM requested {} tool calls", tool_calls.len());

                    self.conversation
                        .add_assistant_with_tools(response.content, tool_calls.clone());

                    for tool_call in tool_calls {
                        let call = ToolsToolCall {
                            id: tool_call.id.clone(),
                            call_type: tool_call.call_type.clone(),
                            function: ToolsFunctionCall {
                                name: tool_call.function.name.clone(),
                                arguments: tool_call.function.arguments.clone(),
                            },
                        };

                        let result = self.executor.execute(&call).await;
                        if result.success {
                            debug!(tool = %tool_call.function.name, "Tool succeeded");
                        } else {
                            warn!("Tool {} failed: {}", tool_call.function.name, result.content);
                        }

                        self.conversation
                            .add_tool_result(&tool_call.id, &result.content);
                        tools_used.push(tool_call.function.name);
                    }

                    tools_executed = true;
                }
                _ => {
                    let text = response
                        .content
                        .unwrap_or_else(|| "I don't have a response.".into());
                    self.conversation.add_assistant(&text);

                    info!("Response: {} chars", text.chars().count());
                    return Reply::new(text, tools_used);
                }
            }
        }

        warn!("Max tool iterations ({}) reached", self.max_tool_iterations);
        Reply::new(
            "I've reached my maximum number of tool uses for this request. Please try again.",
            tools_used,
        )
    }
}
