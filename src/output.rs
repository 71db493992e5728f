//! Report Sink
//!
//! Renders the run's single output artifact (human-readable Markdown or a
//! machine-parsable JSON form) and writes it to a file or stdout. Everything
//! diagnostic goes to the log (stderr); stdout carries only the artifact.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use stack_audit_gates::{GateDecision, ScoreRecord};

use crate::pipeline::{CorpusRunOutcome, PipelineResult};

/// Selected output rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable concatenated report
    Markdown,
    /// Structured artifact for downstream tooling
    Json,
}

/// The lint run's artifact: report text plus optional score and gate outcome
#[derive(Debug, Default, Serialize)]
pub struct LintArtifact {
    /// Rendered analysis text (None when the input was empty and skipped)
    pub report: Option<String>,
    /// Parsed structured score, when requested and parsable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreRecord>,
    /// Free-text score, when structured output was not requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_text: Option<String>,
    /// Gate outcome, when a structured score was parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateDecision>,
}

/// Render the corpus run outcome in the selected format.
pub fn render_corpus(outcome: &CorpusRunOutcome, format: OutputFormat) -> PipelineResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)
            .map_err(stack_audit_core::CoreError::from)?),
        OutputFormat::Markdown => {
            let mut report = String::from("# Analysis Report\n\n");
            report.push_str(&outcome.corpus_report.text);
            if !outcome.skipped.is_empty() {
                report.push_str("\n\n## Skipped (no content)\n");
                for identifier in &outcome.skipped {
                    report.push_str(&format!("\n- {}", identifier));
                }
            }
            if !outcome.failures.is_empty() {
                report.push_str("\n\n## Files that could not be analyzed\n");
                for failure in &outcome.failures {
                    report.push_str(&format!("\n- {}: {}", failure.document, failure.error));
                }
            }
            Ok(report)
        }
    }
}

/// Render the lint artifact in the selected format.
pub fn render_lint(artifact: &LintArtifact, format: OutputFormat) -> PipelineResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(artifact)
            .map_err(stack_audit_core::CoreError::from)?),
        OutputFormat::Markdown => {
            let mut text = artifact.report.clone().unwrap_or_default();
            if let Some(score) = &artifact.score {
                let rendered = serde_json::to_string_pretty(score)
                    .map_err(stack_audit_core::CoreError::from)?;
                text.push_str("\n\n---\n\n");
                text.push_str(&rendered);
            } else if let Some(score_text) = &artifact.score_text {
                text.push_str("\n\n---\n\n");
                text.push_str(score_text);
            }
            if let Some(gate) = &artifact.gate {
                text.push_str(&format!("\n\nGate: {}", gate));
            }
            Ok(text)
        }
    }
}

/// Write the artifact to the given path, or to stdout when no path is set.
pub fn write_artifact(text: &str, output: Option<&Path>) -> std::io::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            info!(path = %path.display(), "report written");
        }
        None => {
            println!("{}", text);
        }
    }
    Ok(())
}
