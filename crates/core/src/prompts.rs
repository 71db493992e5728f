//! Prompt Templates
//!
//! A closed registry of prompt templates keyed by (analysis mode, content
//! category). Templates are pure data with `{filename}` and `{content}`
//! placeholders that are substituted exactly once; rendering is stateless and
//! referentially transparent. The registry is built once at startup so a
//! missing mode/category pair is caught before any model call is issued.

use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::ContentCategory;
use crate::error::{CoreError, CoreResult};
use crate::report::FileReport;

/// Analysis modes the tool can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Deep per-category review of a whole file (chunked)
    Review,
    /// Summarize jobs, structure, and relationships
    Summary,
    /// Identify flaws, risks, and inefficiencies
    Critic,
    /// Suggest 2-3 targeted improvements
    Suggest,
}

impl AnalysisMode {
    /// Stable identifier used in CLI flags and result metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Review => "review",
            AnalysisMode::Summary => "summary",
            AnalysisMode::Critic => "critic",
            AnalysisMode::Suggest => "suggest",
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const REVIEW_TERRAFORM: &str = "You're a Terraform expert. Analyze this file: explain its purpose, risks, inefficiencies, anti-patterns, and suggest improvements.\n\nFile: {filename}\nContent:\n{content}";

const REVIEW_GITLAB: &str = "You're a GitLab CI/CD expert. Analyze this pipeline file for structure, reliability, security, and suggest improvements.\n\nFile: {filename}\nContent:\n{content}";

const REVIEW_SHELL: &str = "You're a Linux shell expert. Analyze this script: explain its function, risks, inefficiencies, and suggestions.\n\nFile: {filename}\nContent:\n{content}";

const REVIEW_PYTHON: &str = "You're a Python code reviewer. Analyze this script: explain its functionality, potential bugs, style issues, and improvements.\n\nFile: {filename}\nContent:\n{content}";

const SUMMARY_GITLAB: &str = "You're a GitLab CI/CD expert. Summarize this pipeline definition: jobs, structure, relationships.\n\nFile: {filename}\nContent:\n{content}";

const CRITIC_GITLAB: &str = "You're a senior DevOps reviewer. Identify flaws, risks, or inefficiencies in this GitLab CI/CD pipeline. Suggest improvements.\n\nFile: {filename}\nContent:\n{content}";

const SUGGEST_GITLAB: &str = "You're an SRE lead. Suggest 2-3 improvements to this pipeline for performance, security, or maintainability.\n\nFile: {filename}\nContent:\n{content}";

/// Registry of (mode, category) -> template
pub struct PromptRegistry {
    templates: HashMap<(AnalysisMode, ContentCategory), &'static str>,
}

impl PromptRegistry {
    /// Build the full built-in template table.
    ///
    /// Review is registered for every category; the summary/critic/suggest
    /// modes only apply to pipeline definitions.
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        templates.insert(
            (AnalysisMode::Review, ContentCategory::Terraform),
            REVIEW_TERRAFORM,
        );
        templates.insert(
            (AnalysisMode::Review, ContentCategory::GitlabCi),
            REVIEW_GITLAB,
        );
        templates.insert((AnalysisMode::Review, ContentCategory::Shell), REVIEW_SHELL);
        templates.insert(
            (AnalysisMode::Review, ContentCategory::Python),
            REVIEW_PYTHON,
        );
        templates.insert(
            (AnalysisMode::Summary, ContentCategory::GitlabCi),
            SUMMARY_GITLAB,
        );
        templates.insert(
            (AnalysisMode::Critic, ContentCategory::GitlabCi),
            CRITIC_GITLAB,
        );
        templates.insert(
            (AnalysisMode::Suggest, ContentCategory::GitlabCi),
            SUGGEST_GITLAB,
        );
        Self { templates }
    }

    /// Whether a template is registered for the given pair
    pub fn supports(&self, mode: AnalysisMode, category: ContentCategory) -> bool {
        self.templates.contains_key(&(mode, category))
    }

    /// Render the template for (mode, category), substituting `{filename}`
    /// and `{content}` exactly once each.
    pub fn render(
        &self,
        mode: AnalysisMode,
        category: ContentCategory,
        filename: &str,
        content: &str,
    ) -> CoreResult<String> {
        let template = self
            .templates
            .get(&(mode, category))
            .ok_or(CoreError::UnknownTemplate { mode, category })?;
        Ok(template
            .replacen("{filename}", filename, 1)
            .replacen("{content}", content, 1))
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Build the corpus-synthesis meta-prompt from the full identifier ->
/// FileReport mapping.
///
/// Every report is embedded under a heading naming its source document, in
/// lexicographic identifier order, so repeated runs produce the same prompt.
/// An empty mapping fails with [`CoreError::EmptyCorpus`] before any model
/// call can be issued.
pub fn corpus_prompt(reports: &BTreeMap<String, FileReport>) -> CoreResult<String> {
    if reports.is_empty() {
        return Err(CoreError::EmptyCorpus);
    }

    let aggregated = reports
        .iter()
        .map(|(identifier, report)| format!("### {}\n\n{}", identifier, report.text))
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(format!(
        "You are a senior DevOps architect. Based on these file analyses, provide:\n\
         1) high-level intent\n\
         2) cross-file issues\n\
         3) modularity/reuse suggestions\n\
         4) docs/test/CI improvements\n\n{}",
        aggregated
    ))
}

/// Build the structured-scoring prompt for a document.
///
/// When `structured` is set, the model is instructed to answer with a single
/// JSON object matching the `ScoreRecord` schema; otherwise free text with
/// the same rubric is requested.
pub fn score_prompt(category: ContentCategory, content: &str, structured: bool) -> String {
    let format_instruction = if structured {
        "Respond with a single JSON object only, no prose around it, in this exact shape:\n\
         {\"structure\": {\"score\": <1-5>, \"reasoning\": \"...\"},\n\
         \"reliability\": {\"score\": <1-5>, \"reasoning\": \"...\"},\n\
         \"security\": {\"score\": <1-5>, \"reasoning\": \"...\"},\n\
         \"maintainability\": {\"score\": <1-5>, \"reasoning\": \"...\"},\n\
         \"overall_score\": <1-5>}"
    } else {
        "Give reasons per criterion and provide an overall score."
    };

    format!(
        "Score this {} content (1-5 scale) on:\n\
         - Structure\n- Reliability\n- Security\n- Maintainability\n\
         {}\n\nContent:\n{}",
        category.display_name(),
        format_instruction,
        content
    )
}
