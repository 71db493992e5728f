//! Core Error Types
//!
//! Defines the foundational error types used across the stack-audit workspace.
//! These are dependency-free (thiserror + std) so that the core crate stays
//! lightweight; model-call errors live in `stack-audit-llm` and score/gate
//! errors in `stack-audit-gates`.

use thiserror::Error;

use crate::document::ContentCategory;
use crate::prompts::AnalysisMode;

/// Core error type for the stack-audit workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The token model for the requested target model is unavailable
    #[error("No token encoding available for model '{model}': {message}")]
    Encoding { model: String, message: String },

    /// The requested mode/category pair has no registered prompt template
    #[error("No prompt template registered for mode '{mode}' and category '{category}'")]
    UnknownTemplate {
        mode: AnalysisMode,
        category: ContentCategory,
    },

    /// Corpus synthesis was requested with no file reports to synthesize
    #[error("No file reports to synthesize: corpus is empty")]
    EmptyCorpus,

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create an encoding error
    pub fn encoding(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encoding {
            model: model.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_error_display() {
        let err = CoreError::encoding("llama3:instruct", "unknown model");
        assert_eq!(
            err.to_string(),
            "No token encoding available for model 'llama3:instruct': unknown model"
        );
    }

    #[test]
    fn test_unknown_template_display() {
        let err = CoreError::UnknownTemplate {
            mode: AnalysisMode::Critic,
            category: ContentCategory::Terraform,
        };
        assert!(err.to_string().contains("critic"));
        assert!(err.to_string().contains("terraform"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
    }
}
