//! Stack Audit Gates
//!
//! Structured, multi-criteria scoring of a document and the threshold-based
//! pass/fail gate built on top of it. The model is asked for a JSON score
//! matching [`ScoreRecord`]; in strict mode any parse failure is fatal to the
//! run and the raw output is preserved for diagnosis.

pub mod gate;
pub mod score;

// Re-export main types
pub use gate::GateDecision;
pub use score::{parse_score, CriterionScore, GateError, GateResult, ScoreRecord};
