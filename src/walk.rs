//! Corpus Discovery
//!
//! Walks a directory tree and yields a `Document` for every file whose
//! extension matches the selected content category. The walk is
//! gitignore-aware and the result is sorted by identifier so repeated runs
//! see the same order.

use std::path::Path;

use ignore::WalkBuilder;
use tracing::{debug, warn};

use stack_audit_core::{ContentCategory, Document};

use crate::pipeline::{PipelineError, PipelineResult};

/// Collect all documents of one category under `root`.
///
/// Unreadable files are logged and skipped; a missing root is an error.
pub fn collect_documents(
    root: &Path,
    category: ContentCategory,
) -> PipelineResult<Vec<Document>> {
    // Surface a missing/unreadable root as an error instead of an empty walk.
    std::fs::metadata(root).map_err(PipelineError::Io)?;

    // Dotfiles like .gitlab-ci.yml are part of the corpus; don't skip hidden.
    let mut documents = Vec::new();
    for entry in WalkBuilder::new(root).hidden(false).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "walk error, skipping entry");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        if !category.matches(path) {
            debug!(path = %path.display(), "extension mismatch, skipping");
            continue;
        }

        // Tolerate non-UTF-8 bytes the way a reviewer would: keep what is
        // readable rather than dropping the file.
        match std::fs::read(path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes).into_owned();
                documents.push(Document::new(
                    path.display().to_string(),
                    content,
                    category,
                ));
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable file, skipping");
            }
        }
    }

    documents.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    debug!(count = documents.len(), %category, "collected documents");
    Ok(documents)
}
