pub mod assistant;
pub mod client;

pub use assistant::{parse_classification, Assistant, Classification, INVALID_COMMAND_CONTEXT};
pub use client::{CompletionBackend, CompletionRequest, LlmClient, Message};
