//! Stack Audit
//!
//! Binary crate glue: CLI surface, configuration, corpus discovery, the
//! git-diff collaborator, pipeline orchestration, and the report sink. The
//! reusable building blocks live in the workspace crates
//! (`stack-audit-core`, `stack-audit-llm`, `stack-audit-gates`).

pub mod cli;
pub mod config;
pub mod git;
pub mod output;
pub mod pipeline;
pub mod walk;
