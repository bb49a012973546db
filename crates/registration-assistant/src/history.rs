//! In-memory conversation history.

use llm_client::{Message, Role, ToolCall};

/// Messages exchanged with the LLM, excluding the system prompt.
#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
    max_messages: usize,
}

impl Conversation {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages,
        }
    }

    pub fn add_user(&mut self, content: &str) {
        self.push(Message::user(content));
    }

    pub fn add_assistant(&mut self, content: &str) {
        self.push(Message::assistant(content));
    }

    pub fn add_assistant_with_tools(&mut self, content: Option<String>, tool_calls: Vec<ToolCall>) {
        self.push(Message::assistant_with_tool_calls(content, tool_calls));
    }

    pub fn add_tool_result(&mut self, tool_call_id: &str, content: &str) {
        self.push(Message::tool_result(tool_call_id, content));
    }

    /// Full request payload: the system prompt followed by the history.
    pub fn to_messages(&self, system_prompt: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.push(Message::system(system_prompt));
        messages.extend(self.messages.iter().cloned());
        messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.trim();
    }

    /// Trim to max messages, keeping the most recent.
    ///
    /// Tool results left at the front lose the assistant message that
    /// requested them, so they are dropped too.
    fn trim(&mut self) {
        if self.messages.len() > self.max_messages {
            let start = self.messages.len() - self.max_messages;
            self.messages.drain(..start);
        }

        let orphans = self
            .messages
            .iter()
            .take_while(|m| m.role == Role::Tool)
            .count();
        self.messages.drain(..orphans);
    }
}
