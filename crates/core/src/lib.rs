//! Stack Audit Core
//!
//! Foundational types for the hierarchical document-analysis pipeline:
//! - Documents and content categories
//! - Token-bounded chunking with model-specific encodings
//! - The closed prompt-template registry
//! - Chunk-to-file report aggregation and the corpus synthesis prompt
//!
//! Everything here is synchronous and model-client-free; dispatching prompts
//! to a backend lives in `stack-audit-llm`.

pub mod chunker;
pub mod document;
pub mod error;
pub mod prompts;
pub mod report;

// Re-export main types
pub use chunker::{Chunk, TokenChunker, DEFAULT_MAX_CHUNK_TOKENS};
pub use document::{ContentCategory, Document};
pub use error::{CoreError, CoreResult};
pub use prompts::{corpus_prompt, score_prompt, AnalysisMode, PromptRegistry};
pub use report::{AnalysisResult, CorpusReport, FileReport, CHUNK_SEPARATOR};
