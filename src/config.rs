//! Configuration & Credentials
//!
//! Resolves the provider configuration from CLI flags plus the environment.
//! `.env` files are honored the same way the environment is. A missing API
//! key is not an error here; the credential problem surfaces as an
//! authentication error on the first hosted model call.

use stack_audit_llm::{ProviderConfig, ProviderKind};

/// Environment variable holding the hosted API credential
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable overriding the hosted API endpoint
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Load `.env` into the process environment, if present.
pub fn load_env() {
    let _ = dotenvy::dotenv();
}

/// Default model per backend kind
pub fn default_model(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::OpenAi => "gpt-4-turbo",
        ProviderKind::Ollama => "llama3:instruct",
    }
}

/// Build the provider configuration from flags and environment.
pub fn provider_config(
    kind: ProviderKind,
    model: Option<String>,
    temperature: f32,
) -> ProviderConfig {
    ProviderConfig {
        kind,
        api_key: std::env::var(API_KEY_VAR).ok(),
        model: model.unwrap_or_else(|| default_model(kind).to_string()),
        base_url: std::env::var(BASE_URL_VAR).ok(),
        temperature,
        ..Default::default()
    }
}
