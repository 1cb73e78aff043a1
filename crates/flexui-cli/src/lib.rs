//! flexui CLI - command-line tools for FlexibleContent documents
//!
//! Subcommands:
//! - `validate`: parse, validate and fingerprint a document
//! - `resolve`: map a dotted path to a component id
//! - `extract`: recover a JSON object from a saved model reply
//! - `styles`: effective declarations of a component at a breakpoint
//! - `modify`: run a modification against the configured oracle
//! - `info`: versions and operation names

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod commands;
pub mod logging;

// Re-exports for convenience
pub use commands::{BreakpointChoice, ModifyOptions};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
