//! AI Shell - an interactive shell with a natural-language assistant

pub mod core;
pub mod llm;
pub mod shell;
pub mod ui;
