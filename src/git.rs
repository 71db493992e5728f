//! Version-Control Diff Collaborator
//!
//! Thin wrapper around `git diff` that supplies the textual diff of one file
//! between two revisions as a substitute document. An empty diff is a valid
//! "no analysis needed" signal, not an error.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::pipeline::{PipelineError, PipelineResult};

/// Get the diff of `file` between `base` and `head` in the repository at
/// `repo`.
///
/// Returns the trimmed diff text; an empty string means the file did not
/// change in the range and callers must short-circuit without model calls.
pub async fn diff_file(
    repo: &Path,
    base: &str,
    head: &str,
    file: &Path,
) -> PipelineResult<String> {
    let range = format!("{}..{}", base, head);
    debug!(%range, file = %file.display(), "extracting diff");

    let output = Command::new("git")
        .arg("diff")
        .arg(&range)
        .arg("--")
        .arg(file)
        .current_dir(repo)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| PipelineError::Git(format!("failed to run git: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PipelineError::Git(format!(
            "git diff {} exited with {}: {}",
            range,
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
