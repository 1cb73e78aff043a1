//! flexui Oracle - chat-completions client
//!
//! Implements [`flexui_core::Oracle`] over any OpenAI-compatible
//! `/chat/completions` endpoint. Each call is one user turn, non-streaming,
//! authenticated with a bearer key read from the environment.
//!
//! # Example
//!
//! ```rust,ignore
//! use flexui_core::{ModificationOrchestrator, ModifierConfig};
//! use flexui_oracle::ChatCompletionsOracle;
//! use std::sync::Arc;
//!
//! let config = ModifierConfig::from_file("flexui.toml")?;
//! let oracle = ChatCompletionsOracle::from_settings(&config.oracle)?;
//! let orchestrator = ModificationOrchestrator::new(Arc::new(oracle));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod wire;

// Re-exports for convenience
pub use client::ChatCompletionsOracle;
pub use wire::{completions_url, ChatCompletionRequest, ChatCompletionResponse};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
