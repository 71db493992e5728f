//! Command-Line Interface
//!
//! Flag surface for the two entry points: `analyze` runs the hierarchical
//! corpus pipeline over a directory; `lint` reviews a single pipeline file or
//! a revision-range diff and can score and gate the result.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

use stack_audit_core::{AnalysisMode, ContentCategory, DEFAULT_MAX_CHUNK_TOKENS};
use stack_audit_llm::ProviderKind;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "stack-audit")]
#[command(about = "LLM-assisted review and gating for infrastructure, pipeline, and script corpora")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Completion backend to use
    #[arg(long, global = true, value_enum, default_value_t = ProviderFlag::Openai)]
    pub provider: ProviderFlag,

    /// Model name (e.g. gpt-4-turbo, llama3:instruct)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Write the report here instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Output rendering
    #[arg(long, global = true, value_enum, default_value_t = OutputFormatFlag::Markdown)]
    pub output_format: OutputFormatFlag,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze every matching file under a directory and synthesize a
    /// project-level report
    Analyze {
        /// Directory to analyze
        #[arg(short, long)]
        path: PathBuf,

        /// Content category to select files by
        #[arg(long, value_enum)]
        category: CategoryFlag,

        /// Analysis mode
        #[arg(long, value_enum, default_value_t = ModeFlag::Review)]
        mode: ModeFlag,

        /// Per-chunk token budget
        #[arg(long, default_value_t = DEFAULT_MAX_CHUNK_TOKENS)]
        max_chunk_tokens: usize,

        /// Model whose token encoding is used for chunking, when it differs
        /// from the target model (local models have no known encoding)
        #[arg(long)]
        encoding_model: Option<String>,

        /// Abort the run on the first per-file failure
        #[arg(long)]
        fail_fast: bool,
    },
    /// Review one pipeline file or a revision-range diff, optionally scoring
    /// and gating it
    #[command(group(ArgGroup::new("input").required(true).args(["file", "diff"])))]
    Lint {
        /// Pipeline file to analyze
        #[arg(long)]
        file: Option<PathBuf>,

        /// Compare pipeline changes between two revisions
        #[arg(long, num_args = 2, value_names = ["BASE", "HEAD"])]
        diff: Option<Vec<String>>,

        /// File the diff range is restricted to
        #[arg(long, default_value = ".gitlab-ci.yml")]
        diff_file: PathBuf,

        /// Content category of the input
        #[arg(long, value_enum, default_value_t = CategoryFlag::GitlabCi)]
        category: CategoryFlag,

        /// Analysis mode
        #[arg(long, value_enum, default_value_t = ModeFlag::Critic)]
        mode: ModeFlag,

        /// Also request a multi-criteria score
        #[arg(long)]
        score: bool,

        /// Require machine-parsable score output and enforce the gate
        #[arg(long)]
        strict: bool,

        /// Minimum overall score required to pass the gate
        #[arg(long, default_value_t = 0.0)]
        min_score: f64,
    },
}

#[derive(Copy, Clone, ValueEnum)]
pub enum ProviderFlag {
    Openai,
    Ollama,
}

impl ProviderFlag {
    pub const fn as_domain(self) -> ProviderKind {
        match self {
            ProviderFlag::Openai => ProviderKind::OpenAi,
            ProviderFlag::Ollama => ProviderKind::Ollama,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub enum CategoryFlag {
    Terraform,
    GitlabCi,
    Shell,
    Python,
}

impl CategoryFlag {
    pub const fn as_domain(self) -> ContentCategory {
        match self {
            CategoryFlag::Terraform => ContentCategory::Terraform,
            CategoryFlag::GitlabCi => ContentCategory::GitlabCi,
            CategoryFlag::Shell => ContentCategory::Shell,
            CategoryFlag::Python => ContentCategory::Python,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub enum ModeFlag {
    Review,
    Summary,
    Critic,
    Suggest,
}

impl ModeFlag {
    pub const fn as_domain(self) -> AnalysisMode {
        match self {
            ModeFlag::Review => AnalysisMode::Review,
            ModeFlag::Summary => AnalysisMode::Summary,
            ModeFlag::Critic => AnalysisMode::Critic,
            ModeFlag::Suggest => AnalysisMode::Suggest,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub enum OutputFormatFlag {
    Markdown,
    Json,
}

impl OutputFormatFlag {
    pub const fn as_domain(self) -> OutputFormat {
        match self {
            OutputFormatFlag::Markdown => OutputFormat::Markdown,
            OutputFormatFlag::Json => OutputFormat::Json,
        }
    }
}
