//! Ollama Provider
//!
//! Implementation of the CompletionProvider trait for a local Ollama
//! installation, invoked as a subprocess (`ollama run <model>`) with the
//! prompt on stdin. Spawn failures surface as transport errors; a non-zero
//! exit from a running binary is a backend error.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::provider::CompletionProvider;
use crate::types::{LlmError, LlmResult, ProviderConfig, RequestOptions};

/// Binary name of the local runner
const OLLAMA_BIN: &str = "ollama";

/// Local process-runner provider
pub struct OllamaProvider {
    config: ProviderConfig,
}

impl OllamaProvider {
    /// Create a new Ollama provider with the given configuration
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str, options: &RequestOptions) -> LlmResult<String> {
        if options.temperature_override.is_some() {
            // `ollama run` has no temperature flag; the option is accepted
            // for interface parity and ignored here.
            debug!("temperature override ignored by local runner");
        }

        let mut child = Command::new(OLLAMA_BIN)
            .arg("run")
            .arg(&self.config.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| LlmError::transport(format!("failed to spawn {}: {}", OLLAMA_BIN, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| LlmError::transport("failed to open stdin of local runner"))?;
        stdin
            .write_all(prompt.as_bytes())
            .await
            .map_err(|e| LlmError::transport(format!("failed to write prompt: {}", e)))?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| LlmError::transport(format!("local runner did not finish: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LlmError::backend(format!(
                "ollama run exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn health_check(&self) -> LlmResult<()> {
        let output = Command::new(OLLAMA_BIN)
            .arg("list")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| LlmError::transport(format!("failed to spawn {}: {}", OLLAMA_BIN, e)))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(LlmError::backend(format!(
                "ollama list exited with {}: {}",
                output.status,
                stderr.trim()
            )))
        }
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}
