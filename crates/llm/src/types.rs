//! Provider Types
//!
//! Configuration and error types shared by all completion backends.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a completion backend can surface.
///
/// Exactly three failure classes: the caller can tell apart "fix your
/// credentials", "the backend was unreachable", and "the backend answered but
/// not with a usable completion". Retry and backoff policy is a caller
/// concern; the client never retries on its own.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Missing or rejected credential
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Network or process failure reaching the backend (including timeouts)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Backend reachable but returned an error or an unusable response
    #[error("Backend error{}: {message}", display_status(.status))]
    Backend { message: String, status: Option<u16> },
}

fn display_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

impl LlmError {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a backend error without an HTTP status
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            status: None,
        }
    }
}

/// Result type alias for provider calls
pub type LlmResult<T> = Result<T, LlmError>;

/// Available backend kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Hosted OpenAI-compatible HTTP API
    OpenAi,
    /// Local model runner invoked as a subprocess
    Ollama,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Ollama => write!(f, "ollama"),
        }
    }
}

/// Configuration for constructing a provider.
///
/// Built once by the caller and handed to [`crate::create_provider`]; absence
/// of a credential is not an error here, it surfaces as
/// [`LlmError::AuthenticationFailed`] on the first call that needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which backend to construct
    pub kind: ProviderKind,
    /// API credential for hosted backends
    pub api_key: Option<String>,
    /// Model identifier (e.g. "gpt-4-turbo", "llama3:instruct")
    pub model: String,
    /// Override for the hosted API endpoint
    pub base_url: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token budget
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::OpenAi,
            api_key: None,
            model: "gpt-4-turbo".to_string(),
            base_url: None,
            temperature: 0.2,
            max_tokens: 4096,
        }
    }
}

/// Per-request options layered over the provider configuration
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Override the configured sampling temperature for this call
    pub temperature_override: Option<f32>,
}
