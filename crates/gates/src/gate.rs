//! Gate Decisions
//!
//! Compares a parsed overall score against a caller-supplied minimum and
//! records the pass/fail outcome. Computed once per run, drives the process
//! exit code, never persisted beyond the run artifact.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::score::ScoreRecord;

/// Pass/fail outcome derived from a [`ScoreRecord`] and a minimum threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDecision {
    /// Overall score the model produced
    pub overall_score: f64,
    /// Minimum score required to pass
    pub min_score: f64,
    /// `true` iff `overall_score >= min_score` (boundary inclusive)
    pub passed: bool,
    /// Unix timestamp of the evaluation
    pub evaluated_at: i64,
}

impl GateDecision {
    /// Evaluate the gate for a parsed score record.
    pub fn evaluate(record: &ScoreRecord, min_score: f64) -> Self {
        let passed = record.overall_score >= min_score;
        info!(
            overall = record.overall_score,
            min = min_score,
            passed,
            "gate evaluated"
        );
        Self {
            overall_score: record.overall_score,
            min_score,
            passed,
            evaluated_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Check if this decision blocks the run
    pub fn is_failure(&self) -> bool {
        !self.passed
    }
}

impl std::fmt::Display for GateDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.passed {
            write!(
                f,
                "pass (score {} >= minimum {})",
                self.overall_score, self.min_score
            )
        } else {
            write!(
                f,
                "fail (score {} < minimum {})",
                self.overall_score, self.min_score
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::CriterionScore;

    fn record(overall: f64) -> ScoreRecord {
        let criterion = CriterionScore {
            score: overall,
            reasoning: String::new(),
        };
        ScoreRecord {
            structure: criterion.clone(),
            reliability: criterion.clone(),
            security: criterion.clone(),
            maintainability: criterion,
            overall_score: overall,
        }
    }

    #[test]
    fn test_below_threshold_fails() {
        let decision = GateDecision::evaluate(&record(3.8), 4.0);
        assert!(!decision.passed);
        assert!(decision.is_failure());
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let decision = GateDecision::evaluate(&record(4.0), 4.0);
        assert!(decision.passed);
        assert!(!decision.is_failure());
    }

    #[test]
    fn test_display() {
        let decision = GateDecision::evaluate(&record(3.8), 4.0);
        assert_eq!(decision.to_string(), "fail (score 3.8 < minimum 4)");

        let decision = GateDecision::evaluate(&record(4.5), 4.0);
        assert!(decision.to_string().starts_with("pass"));
    }
}
