//! Ordered, first-success-wins extraction

use crate::error::{ExtractionError, StrategyFailure};
use crate::strategy::{default_strategies, ExtractionStrategy};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// A recovered JSON object and the strategy that found it
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub value: Value,
    pub strategy: &'static str,
}

/// Recovers a JSON object from an oracle reply
///
/// Recovery says nothing about schema validity; callers validate the value
/// afterwards.
pub struct ResponseExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResponseExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseExtractor")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

impl ResponseExtractor {
    /// Extractor with the five standard strategies
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: default_strategies(),
        }
    }

    /// Extractor with no strategies; add them with [`Self::with_strategy`]
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy (tried after the existing ones)
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl ExtractionStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Strategy names in the order they are tried
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run strategies in order and return the first success
    ///
    /// # Errors
    /// - [`ExtractionError::Empty`] for a blank reply
    /// - [`ExtractionError::Exhausted`] when every strategy failed
    pub fn extract(&self, raw: &str) -> Result<Extracted, ExtractionError> {
        if raw.trim().is_empty() {
            return Err(ExtractionError::Empty);
        }

        let mut attempts = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            match strategy.extract(raw) {
                Ok(value) => {
                    debug!(strategy = strategy.name(), "extraction strategy succeeded");
                    return Ok(Extracted {
                        value,
                        strategy: strategy.name(),
                    });
                }
                Err(error) => {
                    debug!(strategy = strategy.name(), %error, "extraction strategy failed");
                    attempts.push(StrategyFailure {
                        strategy: strategy.name(),
                        error,
                    });
                }
            }
        }
        Err(ExtractionError::Exhausted { attempts })
    }
}
