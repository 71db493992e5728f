//! Report Aggregation
//!
//! Folds ordered per-chunk analysis results into a single file-level report,
//! and wraps the final cross-document synthesis. Entities here are created
//! once by the stage that produces them and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::prompts::AnalysisMode;

/// Separator between chunk analyses inside one file report
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// The model's raw output for one chunk (or one whole document)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Index of the chunk this result belongs to (0 for whole-document prompts)
    pub chunk_index: usize,
    /// Mode/template that produced this result
    pub mode: AnalysisMode,
    /// Raw model output text
    pub text: String,
}

impl AnalysisResult {
    /// Create a new analysis result
    pub fn new(chunk_index: usize, mode: AnalysisMode, text: impl Into<String>) -> Self {
        Self {
            chunk_index,
            mode,
            text: text.into(),
        }
    }
}

/// The reassembled per-document analysis narrative
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Identifier of the document this report belongs to
    pub document: String,
    /// Chunk analyses joined in index order
    pub text: String,
}

impl FileReport {
    /// Create a report from already-joined text
    pub fn new(document: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            text: text.into(),
        }
    }

    /// Assemble a file report from per-chunk results.
    ///
    /// Results are joined in chunk-index order with [`CHUNK_SEPARATOR`] so the
    /// report reads as one continuous narrative. An empty input yields `None`
    /// ("no report"), which callers must treat as "skip", never as a failed or
    /// empty analysis.
    pub fn assemble(document: impl Into<String>, mut results: Vec<AnalysisResult>) -> Option<Self> {
        if results.is_empty() {
            return None;
        }
        results.sort_by_key(|r| r.chunk_index);
        let text = results
            .iter()
            .map(|r| r.text.trim())
            .collect::<Vec<_>>()
            .join(CHUNK_SEPARATOR);
        Some(Self::new(document, text))
    }
}

/// The single cross-document synthesis produced at the end of a corpus run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusReport {
    /// Synthesized project-level report text
    pub text: String,
}

impl CorpusReport {
    /// Create a corpus report
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_joins_in_index_order() {
        let results = vec![
            AnalysisResult::new(0, AnalysisMode::Review, "A"),
            AnalysisResult::new(1, AnalysisMode::Review, "B"),
            AnalysisResult::new(2, AnalysisMode::Review, "C"),
        ];
        let report = FileReport::assemble("main.tf", results).unwrap();
        assert_eq!(report.text, "A\n\nB\n\nC");
        assert_eq!(report.document, "main.tf");
    }

    #[test]
    fn test_assemble_sorts_out_of_order_results() {
        // Index order must win regardless of arrival order.
        let results = vec![
            AnalysisResult::new(2, AnalysisMode::Review, "C"),
            AnalysisResult::new(0, AnalysisMode::Review, "A"),
            AnalysisResult::new(1, AnalysisMode::Review, "B"),
        ];
        let report = FileReport::assemble("main.tf", results).unwrap();
        assert_eq!(report.text, "A\n\nB\n\nC");
    }

    #[test]
    fn test_assemble_empty_is_no_report() {
        assert!(FileReport::assemble("empty.sh", Vec::new()).is_none());
    }

    #[test]
    fn test_assemble_trims_result_whitespace() {
        let results = vec![AnalysisResult::new(0, AnalysisMode::Critic, "  body \n")];
        let report = FileReport::assemble("ci.yml", results).unwrap();
        assert_eq!(report.text, "body");
    }
}
