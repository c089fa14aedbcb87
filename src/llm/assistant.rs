//! Natural-language assistant and input classifier
//!
//! Both operations are single stateless calls to the completion backend.
//! Failures come back as `Err`; choosing a fallback is left to the caller.

use std::sync::Arc;

use crate::core::config::SamplingParams;
use crate::core::error::Result;
use crate::llm::client::{CompletionBackend, CompletionRequest};

/// Context passed to `ask` when the typed command could not be resolved
pub const INVALID_COMMAND_CONTEXT: &str = "The user entered an invalid command.";

/// Whether a line should be run or answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Command,
    Natural,
}

/// Interpret the classifier's raw reply.
///
/// Only an exact (case-insensitive, trimmed) `NATURAL` counts as natural
/// language; anything else, including garbage, is treated as a command.
pub fn parse_classification(reply: &str) -> Classification {
    if reply.trim().to_uppercase() == "NATURAL" {
        Classification::Natural
    } else {
        Classification::Command
    }
}

/// Shell assistant backed by a completion endpoint
#[derive(Clone)]
pub struct Assistant {
    backend: Arc<dyn CompletionBackend>,
}

impl Assistant {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Decide whether `input` is a shell command or natural language
    pub async fn classify(&self, input: &str) -> Result<Classification> {
        let request = classify_request(input);
        let reply = self.backend.complete(&request).await?;
        let classification = parse_classification(&reply);
        tracing::debug!(reply = %reply.trim(), ?classification, "classified input");
        Ok(classification)
    }

    /// Ask the assistant about `input`, optionally describing the situation in `context`
    pub async fn ask(&self, input: &str, context: &str) -> Result<String> {
        let request = ask_request(input, context);
        self.backend.complete(&request).await
    }
}

fn classify_request(input: &str) -> CompletionRequest {
    CompletionRequest::new(CLASSIFY_SYSTEM_PROMPT, input, SamplingParams::CLASSIFY)
}

fn ask_request(input: &str, context: &str) -> CompletionRequest {
    let system = format!("{}\nContext: {}", ASK_SYSTEM_PROMPT, context);
    CompletionRequest::new(system, input, SamplingParams::ASK)
}

/// System prompt for the helpful shell assistant
const ASK_SYSTEM_PROMPT: &str = r#"You are a helpful shell assistant. The user is trying to use the command line.
If they enter natural language, respond helpfully.
If they enter an incorrect command or wrong options, suggest the correct command.
Be concise and practical. Format commands with backticks."#;

/// System prompt for command/natural-language classification
const CLASSIFY_SYSTEM_PROMPT: &str = r#"You are a command classifier. Analyze the user input and determine if it's:
1. A shell command (something to execute in the terminal)
2. Natural language (a question, request, or conversation)

Respond with ONLY one word: "COMMAND" or "NATURAL"

Examples:
- "ls -la" -> COMMAND
- "git status" -> COMMAND
- "how do I list files?" -> NATURAL
- "what time is it?" -> NATURAL
- "cd /home" -> COMMAND
- "show me the current directory" -> NATURAL"#;
