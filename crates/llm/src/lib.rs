//! Stack Audit LLM
//!
//! Provides a unified completion interface over interchangeable backends:
//! - OpenAI (hosted chat completions API)
//! - Ollama (local subprocess runner)
//!
//! The backend is selected once at startup via [`create_provider`]; pipeline
//! stages receive it as `Arc<dyn CompletionProvider>` and never construct
//! clients themselves.

pub mod ollama;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use provider::{create_provider, missing_api_key_error, parse_http_error, CompletionProvider};
pub use types::{LlmError, LlmResult, ProviderConfig, ProviderKind, RequestOptions};
