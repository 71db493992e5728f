//! Completion Provider Trait
//!
//! Defines the common interface for all completion backends and the factory
//! that selects a concrete backend from configuration. The pipeline only ever
//! sees `Arc<dyn CompletionProvider>`, so tests substitute a scripted double.

use std::sync::Arc;

use async_trait::async_trait;

use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;
use crate::types::{LlmError, LlmResult, ProviderConfig, ProviderKind, RequestOptions};

/// Trait that all completion backends must implement.
///
/// One prompt in, one completion text out. No retry logic lives here; call
/// sites decide their own tolerance per the errors they receive.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Send a prompt and get the complete response text.
    async fn complete(&self, prompt: &str, options: &RequestOptions) -> LlmResult<String>;

    /// Check if the provider is reachable and usable.
    ///
    /// For hosted backends this validates the API key; for the local runner
    /// it checks that the runner binary responds.
    async fn health_check(&self) -> LlmResult<()>;

    /// Get the configuration for this provider.
    fn config(&self) -> &ProviderConfig;
}

/// Create a provider from its configuration.
///
/// Factory function that maps [`ProviderKind`] to the concrete backend
/// implementation.
pub fn create_provider(config: ProviderConfig) -> Arc<dyn CompletionProvider> {
    match config.kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(config)),
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(config)),
    }
}

/// Helper function to create an error for a missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Helper function to classify HTTP error status codes
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        _ => LlmError::Backend {
            message: format!("{}: {}", provider, body),
            status: Some(status),
        },
    }
}
