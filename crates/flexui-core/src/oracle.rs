//! Oracle seam
//!
//! The oracle turns a prompt into free-form text that should contain a
//! modified document. Implementations must be safe to share across
//! concurrent requests.

use crate::error::OracleError;
use async_trait::async_trait;

/// External text generator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Generate a reply for `prompt`
    ///
    /// # Errors
    /// Returns [`OracleError`] for transport or upstream failures
    async fn generate(&self, prompt: &str) -> Result<String, OracleError>;
}
