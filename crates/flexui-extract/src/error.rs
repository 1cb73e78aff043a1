//! Error types for response extraction
//!
//! A single strategy failing is routine and only logged. The extractor
//! reports [`ExtractionError`] once every strategy has failed, carrying
//! each strategy's reason.

use std::fmt::{self, Display, Formatter};

/// Why one strategy could not recover an object
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// Nothing in the text looked like a candidate for this strategy
    #[error("no candidate found")]
    NoCandidate,

    /// Candidate text was not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Candidate parsed, but not to an object
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// One failed attempt, in strategy order
#[derive(Debug)]
pub struct StrategyFailure {
    pub strategy: &'static str,
    pub error: StrategyError,
}

impl Display for StrategyFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy, self.error)
    }
}

/// No strategy recovered a JSON object
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// Reply was empty or whitespace only
    #[error("response is empty")]
    Empty,

    /// Every strategy failed
    #[error("no JSON object could be recovered ({})", summarize(.attempts))]
    Exhausted { attempts: Vec<StrategyFailure> },
}

impl ExtractionError {
    /// Per-strategy failures (empty for [`ExtractionError::Empty`])
    #[must_use]
    pub fn attempts(&self) -> &[StrategyFailure] {
        match self {
            Self::Empty => &[],
            Self::Exhausted { attempts } => attempts,
        }
    }
}

fn summarize(attempts: &[StrategyFailure]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_lists_attempts() {
        let err = ExtractionError::Exhausted {
            attempts: vec![
                StrategyFailure {
                    strategy: "whole_text",
                    error: StrategyError::NotAnObject("array"),
                },
                StrategyFailure {
                    strategy: "fenced_block",
                    error: StrategyError::NoCandidate,
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "no JSON object could be recovered (whole_text: expected a JSON object, found array; fenced_block: no candidate found)"
        );
        assert_eq!(err.attempts().len(), 2);
    }
}
