//! Documents and Content Categories
//!
//! A `Document` is a single unit of analyzable text; a `ContentCategory` is
//! the closed set of file classes the tool knows how to review, each with its
//! own extension set and prompt persona.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Supported content categories for corpus analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentCategory {
    /// Terraform infrastructure code (.tf, .tfvars)
    Terraform,
    /// GitLab CI/CD pipeline definitions (.yml, .yaml)
    GitlabCi,
    /// Shell scripts (.sh)
    Shell,
    /// Python source (.py)
    Python,
}

impl ContentCategory {
    /// All categories, in presentation order
    pub fn all() -> [ContentCategory; 4] {
        [
            ContentCategory::Terraform,
            ContentCategory::GitlabCi,
            ContentCategory::Shell,
            ContentCategory::Python,
        ]
    }

    /// File extensions (without the dot) that belong to this category
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ContentCategory::Terraform => &["tf", "tfvars"],
            ContentCategory::GitlabCi => &["yml", "yaml"],
            ContentCategory::Shell => &["sh"],
            ContentCategory::Python => &["py"],
        }
    }

    /// Whether a path's extension matches this category
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions().contains(&ext))
            .unwrap_or(false)
    }

    /// Get human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ContentCategory::Terraform => "Terraform",
            ContentCategory::GitlabCi => "GitLab CI/CD",
            ContentCategory::Shell => "Shell",
            ContentCategory::Python => "Python",
        }
    }

    /// Stable identifier used in template keys and CLI flags
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::Terraform => "terraform",
            ContentCategory::GitlabCi => "gitlab-ci",
            ContentCategory::Shell => "shell",
            ContentCategory::Python => "python",
        }
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single analyzable text unit: a file's content, a git diff, or any other
/// logical document. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Display path or logical name, unique within one run
    pub identifier: String,
    /// Raw text content
    pub content: String,
    /// Content class this document belongs to
    pub category: ContentCategory,
}

impl Document {
    /// Create a new document
    pub fn new(
        identifier: impl Into<String>,
        content: impl Into<String>,
        category: ContentCategory,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            content: content.into(),
            category,
        }
    }

    /// Whether the document has no analyzable content
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}
