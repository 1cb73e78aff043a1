//! flexui Core - validate-modify-validate orchestration
//!
//! Applies a natural-language instruction to a FlexibleContent document:
//! - Rejects invalid input documents before any oracle call
//! - Narrows the instruction to one component when a target is known
//! - Recovers a JSON document from the oracle's free-form reply
//! - Accepts the result only if it validates against the schema
//!
//! # Example
//!
//! ```rust,ignore
//! use flexui_core::{ModificationOrchestrator, TargetAddress};
//! use std::sync::Arc;
//!
//! # async fn example(oracle: Arc<dyn flexui_core::Oracle>, doc: flexui_schema::FlexibleContent)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = ModificationOrchestrator::new(oracle);
//! let target = TargetAddress::Id("headline".into());
//! let outcome = orchestrator
//!     .apply(&doc, "make the headline 24px", Some(&target))
//!     .await?;
//!
//! println!("{}", outcome.summary);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod oracle;
pub mod orchestrator;
pub mod prompt;
pub mod types;

// Re-exports for convenience
pub use config::{ModifierConfig, OracleSettings};
pub use error::{ConfigError, ErrorKind, ModificationError, OracleError};
pub use oracle::Oracle;
pub use orchestrator::{ModificationOrchestrator, OPERATIONS};
pub use prompt::PromptBuilder;
pub use types::{
    ChatMessage, ModificationOutcome, ModificationRequest, ModificationResponse,
    ModificationWarning, RequestId, TargetAddress, TargetComponent,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running modifications
    pub use crate::{
        ModificationError, ModificationOrchestrator, ModificationOutcome, ModificationRequest,
        ModificationResponse, ModifierConfig, Oracle, OracleError, TargetAddress,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
