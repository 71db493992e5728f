//! Structured Scores
//!
//! Schema for the multi-criteria score the model is asked to produce, and the
//! strict parser that turns raw model output into a [`ScoreRecord`]. Parsing
//! failure is a distinct, terminal condition that always preserves the raw
//! text for diagnosis; it is never coerced into a zero score.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Gate-evaluation errors
#[derive(Error, Debug)]
pub enum GateError {
    /// The model's score output did not match the expected schema
    #[error("model returned an unparsable score: {message}")]
    ParseFailed {
        message: String,
        /// Raw model output, preserved verbatim for diagnosis
        raw: String,
    },
}

/// Result type alias for gate errors
pub type GateResult<T> = Result<T, GateError>;

/// Score and reasoning for a single criterion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionScore {
    /// Numeric value on the 1-5 scale
    pub score: f64,
    /// Model's reasoning for the value
    #[serde(default)]
    pub reasoning: String,
}

/// The full multi-criteria score for one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub structure: CriterionScore,
    pub reliability: CriterionScore,
    pub security: CriterionScore,
    pub maintainability: CriterionScore,
    /// Overall numeric score on the 1-5 scale
    pub overall_score: f64,
}

impl ScoreRecord {
    /// The fixed criterion set, in rubric order
    pub fn criteria(&self) -> [(&'static str, &CriterionScore); 4] {
        [
            ("structure", &self.structure),
            ("reliability", &self.reliability),
            ("security", &self.security),
            ("maintainability", &self.maintainability),
        ]
    }
}

/// Parse raw model output into a [`ScoreRecord`].
///
/// Models frequently wrap the JSON in a markdown code fence even when told
/// not to; a fenced block is unwrapped before parsing. Anything that still
/// fails to match the schema is a [`GateError::ParseFailed`] carrying the
/// original text.
pub fn parse_score(raw: &str) -> GateResult<ScoreRecord> {
    let candidate = strip_code_fence(raw.trim());
    debug!(len = candidate.len(), "parsing structured score");

    serde_json::from_str(candidate).map_err(|e| GateError::ParseFailed {
        message: e.to_string(),
        raw: raw.to_string(),
    })
}

/// Unwrap a ```json ... ``` (or bare ```) fence if the whole text is one block
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence line.
    match inner.split_once('\n') {
        Some((first_line, body)) if first_line.len() <= 8 && !first_line.contains('{') => {
            body.trim()
        }
        _ => inner.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "structure": {"score": 4, "reasoning": "clear stages"},
        "reliability": {"score": 3.5, "reasoning": "no retries"},
        "security": {"score": 4, "reasoning": "no secrets in file"},
        "maintainability": {"score": 4.5, "reasoning": "templated jobs"},
        "overall_score": 4.0
    }"#;

    #[test]
    fn test_parse_valid_score() {
        let record = parse_score(VALID).unwrap();
        assert!((record.overall_score - 4.0).abs() < f64::EPSILON);
        assert!((record.reliability.score - 3.5).abs() < f64::EPSILON);
        assert_eq!(record.structure.reasoning, "clear stages");
    }

    #[test]
    fn test_parse_fenced_score() {
        let fenced = format!("```json\n{}\n```", VALID);
        let record = parse_score(&fenced).unwrap();
        assert!((record.overall_score - 4.0).abs() < f64::EPSILON);

        let bare_fence = format!("```\n{}\n```", VALID);
        assert!(parse_score(&bare_fence).is_ok());
    }

    #[test]
    fn test_parse_failure_preserves_raw() {
        let raw = "The pipeline looks great, I'd give it a 4 out of 5!";
        let err = parse_score(raw).unwrap_err();
        match err {
            GateError::ParseFailed { raw: preserved, .. } => {
                assert_eq!(preserved, raw);
            }
        }
    }

    #[test]
    fn test_parse_missing_criterion_fails() {
        let partial = r#"{"structure": {"score": 4}, "overall_score": 4.0}"#;
        assert!(parse_score(partial).is_err());
    }

    #[test]
    fn test_criteria_ordering() {
        let record = parse_score(VALID).unwrap();
        let names: Vec<&str> = record.criteria().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec!["structure", "reliability", "security", "maintainability"]
        );
    }
}
