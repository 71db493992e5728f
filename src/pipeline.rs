//! Analysis Pipeline
//!
//! Orchestrates the hierarchical run: documents are chunked, each chunk is
//! dispatched to the completion provider, per-chunk results are folded into
//! file reports, and the full report mapping is synthesized into one
//! project-level report. The provider, chunker, and prompt registry are
//! injected at construction; nothing here holds global state, and every
//! entity is produced once and handed on, so a run can be aborted between
//! any two model calls without corrupting earlier results.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use stack_audit_core::{
    corpus_prompt, score_prompt, AnalysisMode, AnalysisResult, CoreError, CorpusReport, Document,
    FileReport, PromptRegistry, TokenChunker,
};
use stack_audit_gates::{parse_score, GateError, ScoreRecord};
use stack_audit_llm::{CompletionProvider, LlmError, RequestOptions};

/// Errors surfaced by pipeline stages
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("git diff failed: {0}")]
    Git(String),
}

/// Result type alias for pipeline errors
pub type PipelineResult<T> = Result<T, PipelineError>;

/// A per-document failure recorded during a corpus run
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFailure {
    /// Identifier of the document that failed
    pub document: String,
    /// Rendered error message
    pub error: String,
}

/// Everything a corpus run produced
#[derive(Debug, Serialize)]
pub struct CorpusRunOutcome {
    /// Per-document reports, keyed by identifier (lexicographic)
    pub file_reports: BTreeMap<String, FileReport>,
    /// The project-level synthesis
    pub corpus_report: CorpusReport,
    /// Documents whose analysis failed; the run continued without them
    pub failures: Vec<DocumentFailure>,
    /// Blank documents that produced no chunks and were skipped
    pub skipped: Vec<String>,
}

/// Outcome of a scoring request
#[derive(Debug)]
pub enum ScoreOutcome {
    /// Machine-parsable score matching the expected schema
    Structured(ScoreRecord),
    /// Free-text scoring; no gate decision can be computed from this
    FreeText(String),
}

/// The pipeline orchestrator.
///
/// Dispatch is fully sequential: one model call at a time, corpus synthesis
/// strictly after every file report is complete.
pub struct CorpusAnalyzer {
    provider: Arc<dyn CompletionProvider>,
    chunker: TokenChunker,
    registry: PromptRegistry,
    options: RequestOptions,
    fail_fast: bool,
}

impl CorpusAnalyzer {
    /// Create an analyzer with injected collaborators.
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        chunker: TokenChunker,
        registry: PromptRegistry,
    ) -> Self {
        Self {
            provider,
            chunker,
            registry,
            options: RequestOptions::default(),
            fail_fast: false,
        }
    }

    /// Set per-request options for every dispatched call.
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Make the first per-document failure abort the whole corpus run.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Analyze one document chunk by chunk and assemble its file report.
    ///
    /// Returns `None` for a blank document: no chunks, no model calls, no
    /// report. Callers treat this as "skip", not as a failed analysis.
    pub async fn analyze_document(
        &self,
        document: &Document,
        mode: AnalysisMode,
    ) -> PipelineResult<Option<FileReport>> {
        let chunks = self.chunker.chunk(document)?;
        if chunks.is_empty() {
            info!(document = %document.identifier, "no content to analyze, skipping");
            return Ok(None);
        }

        let filename = display_filename(&document.identifier);
        let mut results = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let prompt =
                self.registry
                    .render(mode, document.category, filename, &chunk.text)?;
            let text = self.provider.complete(&prompt, &self.options).await?;
            results.push(AnalysisResult::new(chunk.index, mode, text));
        }

        info!(
            document = %document.identifier,
            chunks = chunks.len(),
            "document analyzed"
        );
        Ok(FileReport::assemble(&document.identifier, results))
    }

    /// Run the full corpus pipeline over an ordered document stream.
    ///
    /// Per-document failures are recorded and the run proceeds with the
    /// remaining documents (unless `fail_fast` is set); partial results stay
    /// useful. Corpus synthesis is a strict barrier after the last document
    /// and is fatal when it fails — including the empty-corpus case.
    pub async fn run_corpus(
        &self,
        documents: &[Document],
        mode: AnalysisMode,
    ) -> PipelineResult<CorpusRunOutcome> {
        let mut file_reports = BTreeMap::new();
        let mut failures = Vec::new();
        let mut skipped = Vec::new();

        for document in documents {
            info!(document = %document.identifier, "analyzing");
            match self.analyze_document(document, mode).await {
                Ok(Some(report)) => {
                    file_reports.insert(document.identifier.clone(), report);
                }
                Ok(None) => {
                    skipped.push(document.identifier.clone());
                }
                Err(err) => {
                    warn!(document = %document.identifier, error = %err, "analysis failed");
                    if self.fail_fast {
                        return Err(err);
                    }
                    failures.push(DocumentFailure {
                        document: document.identifier.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        let corpus_report = self.synthesize(&file_reports).await?;

        Ok(CorpusRunOutcome {
            file_reports,
            corpus_report,
            failures,
            skipped,
        })
    }

    /// Synthesize the project-level report from the complete file-report
    /// mapping with exactly one model call.
    ///
    /// Fails fast with `EmptyCorpus` before any call when the mapping is
    /// empty.
    pub async fn synthesize(
        &self,
        file_reports: &BTreeMap<String, FileReport>,
    ) -> PipelineResult<CorpusReport> {
        let prompt = corpus_prompt(file_reports)?;
        info!(files = file_reports.len(), "synthesizing corpus report");
        let text = self.provider.complete(&prompt, &self.options).await?;
        Ok(CorpusReport::new(text))
    }
}

/// Analyze a whole document with a single prompt (no chunking, so no token
/// encoding is required — lint-style inputs are expected to fit one call).
///
/// Returns `None` for a blank document: skip, not a failed analysis.
pub async fn analyze_whole(
    provider: &dyn CompletionProvider,
    registry: &PromptRegistry,
    options: &RequestOptions,
    document: &Document,
    mode: AnalysisMode,
) -> PipelineResult<Option<AnalysisResult>> {
    if document.is_blank() {
        info!(document = %document.identifier, "no content to analyze, skipping");
        return Ok(None);
    }

    let filename = display_filename(&document.identifier);
    let prompt = registry.render(mode, document.category, filename, &document.content)?;
    let text = provider.complete(&prompt, options).await?;
    Ok(Some(AnalysisResult::new(0, mode, text)))
}

/// Request a score for a document.
///
/// With `structured` set, the raw output is parsed against the
/// [`ScoreRecord`] schema; a mismatch is a [`GateError::ParseFailed`]
/// carrying the raw text, never a fabricated zero score.
pub async fn score_document(
    provider: &dyn CompletionProvider,
    options: &RequestOptions,
    document: &Document,
    structured: bool,
) -> PipelineResult<ScoreOutcome> {
    let prompt = score_prompt(document.category, &document.content, structured);
    let raw = provider.complete(&prompt, options).await?;
    if structured {
        Ok(ScoreOutcome::Structured(parse_score(&raw)?))
    } else {
        Ok(ScoreOutcome::FreeText(raw))
    }
}

/// Basename used inside prompts; the full identifier stays on the report
fn display_filename(identifier: &str) -> &str {
    Path::new(identifier)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(identifier)
}
