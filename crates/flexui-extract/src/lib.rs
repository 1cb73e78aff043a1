//! flexui Extract - recover JSON documents from model replies
//!
//! Oracle replies are free-form text. They may be clean JSON, JSON inside a
//! markdown fence, JSON surrounded by prose, or almost-JSON with trailing
//! commas. [`ResponseExtractor`] tries an ordered list of pure strategies
//! and keeps the first that yields a JSON object:
//!
//! 1. [`WholeText`]: the trimmed reply as-is
//! 2. [`FencedBlock`]: a `json`-tagged or untagged fenced code block
//! 3. [`BraceSpan`]: the first balanced `{...}` span
//! 4. [`StripPreamble`]: the reply without preamble phrases and fences
//! 5. [`RepairTrailingCommas`]: step 4 with trailing commas removed
//!
//! # Example
//!
//! ```rust
//! use flexui_extract::ResponseExtractor;
//!
//! let reply = "Here is the modified JSON:\n```json\n{\"sections\": {},}\n```";
//! let extracted = ResponseExtractor::new().extract(reply).unwrap();
//! assert_eq!(extracted.strategy, "repair_trailing_commas");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod extractor;
pub mod scan;
pub mod strategy;

// Re-exports for convenience
pub use error::{ExtractionError, StrategyError, StrategyFailure};
pub use extractor::{Extracted, ResponseExtractor};
pub use strategy::{
    default_strategies, parse_object, BraceSpan, ExtractionStrategy, FencedBlock,
    RepairTrailingCommas, StripPreamble, WholeText,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
