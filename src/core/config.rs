//! Shell configuration with documented defaults
//!
//! Everything the shell reads from the environment is collected here,
//! together with the sampling parameters used for each kind of model call.

use crate::core::error::{Result, ShellError};

/// Environment variable holding the completion endpoint credential (required)
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable overriding the completion endpoint base address
pub const BASE_URL_VAR: &str = "OPENAI_API_BASE_URL";

/// Environment variable overriding the model identifier
pub const MODEL_VAR: &str = "OPENAI_MODEL";

/// Public OpenAI endpoint, used when no base address is configured
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Model used for both classification and assistant calls by default
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Sampling parameters attached to a single completion request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl SamplingParams {
    /// Classification needs a single word and should be near-deterministic.
    pub const CLASSIFY: SamplingParams = SamplingParams {
        temperature: 0.1,
        max_tokens: 10,
    };

    /// Assistant replies are short answers or command suggestions.
    ///
    /// A moderate temperature keeps suggestions varied without drifting
    /// away from the command the user was probably trying to type.
    pub const ASK: SamplingParams = SamplingParams {
        temperature: 0.7,
        max_tokens: 200,
    };
}

/// Runtime configuration for the shell
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Credential sent to the completion endpoint
    pub api_key: String,
    /// Base address of the completion endpoint (no trailing slash)
    pub base_url: String,
    /// Model identifier used for every request
    pub model: String,
}

impl ShellConfig {
    /// Build the configuration from process environment variables
    ///
    /// Required: OPENAI_API_KEY
    /// Optional: OPENAI_API_BASE_URL (defaults to the public OpenAI endpoint)
    /// Optional: OPENAI_MODEL (defaults to gpt-4.1-mini)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ShellError::MissingApiKey)?;
        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let model = lookup(MODEL_VAR)
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.into());

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}
