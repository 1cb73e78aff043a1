//! Extraction strategies
//!
//! Each strategy is a pure function from reply text to a JSON object. The
//! [`ResponseExtractor`](crate::ResponseExtractor) tries them in order and
//! keeps the first success.

use crate::error::StrategyError;
use crate::scan;
use pulldown_cmark::{CodeBlockKind, Event, Parser as MdParser, Tag, TagEnd};
use serde_json::Value;

/// One way of recovering a JSON object from free-form text
///
/// Implement this trait to add a strategy to a custom extractor.
pub trait ExtractionStrategy: Send + Sync {
    /// Stable name used in logs and errors
    fn name(&self) -> &'static str;

    /// Recover a JSON object from `text`
    ///
    /// # Errors
    /// Returns [`StrategyError`] when this strategy finds nothing usable
    fn extract(&self, text: &str) -> Result<Value, StrategyError>;
}

/// Parse `candidate` and require a JSON object
///
/// # Errors
/// [`StrategyError::Json`] for invalid syntax, [`StrategyError::NotAnObject`]
/// for any other JSON kind
pub fn parse_object(candidate: &str) -> Result<Value, StrategyError> {
    let value: Value = serde_json::from_str(candidate)?;
    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Err(StrategyError::NotAnObject("null")),
        Value::Bool(_) => Err(StrategyError::NotAnObject("boolean")),
        Value::Number(_) => Err(StrategyError::NotAnObject("number")),
        Value::String(_) => Err(StrategyError::NotAnObject("string")),
        Value::Array(_) => Err(StrategyError::NotAnObject("array")),
    }
}

/// Try candidates in order; report the last failure if none parses
fn first_object<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
) -> Result<Value, StrategyError> {
    let mut last = StrategyError::NoCandidate;
    for candidate in candidates {
        match parse_object(candidate) {
            Ok(value) => return Ok(value),
            Err(err) => last = err,
        }
    }
    Err(last)
}

/// The whole trimmed reply is the document
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeText;

impl ExtractionStrategy for WholeText {
    fn name(&self) -> &'static str {
        "whole_text"
    }

    fn extract(&self, text: &str) -> Result<Value, StrategyError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StrategyError::NoCandidate);
        }
        parse_object(text)
    }
}

/// Contents of a fenced code block
///
/// Blocks tagged `json` (or `json5`, `javascript`, ...) and untagged blocks
/// are candidates; blocks tagged with another language are skipped. The
/// first candidate that parses wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct FencedBlock;

impl FencedBlock {
    fn is_data_tag(tag: &str) -> bool {
        let tag = tag.split_whitespace().next().unwrap_or_default();
        tag.is_empty()
            || ["json", "json5", "jsonc", "javascript", "js"]
                .iter()
                .any(|t| tag.eq_ignore_ascii_case(t))
    }

    /// Data-tagged fenced code blocks, in document order
    #[must_use]
    pub fn blocks(text: &str) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut current: Option<String> = None;

        for event in MdParser::new(text) {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(tag))) => {
                    if Self::is_data_tag(&tag) {
                        current = Some(String::new());
                    }
                }
                Event::Text(chunk) => {
                    if let Some(ref mut code) = current {
                        code.push_str(&chunk);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(code) = current.take() {
                        blocks.push(code);
                    }
                }
                _ => {}
            }
        }
        blocks
    }
}

impl ExtractionStrategy for FencedBlock {
    fn name(&self) -> &'static str {
        "fenced_block"
    }

    fn extract(&self, text: &str) -> Result<Value, StrategyError> {
        let blocks = Self::blocks(text);
        first_object(blocks.iter().map(String::as_str))
    }
}

/// First balanced `{...}` span, then first `{` to last `}`
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceSpan;

impl ExtractionStrategy for BraceSpan {
    fn name(&self) -> &'static str {
        "brace_span"
    }

    fn extract(&self, text: &str) -> Result<Value, StrategyError> {
        let balanced = scan::balanced_object_span(text);
        let greedy = scan::greedy_object_span(text).filter(|g| Some(*g) != balanced);
        first_object(balanced.into_iter().chain(greedy))
    }
}

/// Reply with preamble phrases and fence markers removed
#[derive(Debug, Clone, Copy, Default)]
pub struct StripPreamble;

impl ExtractionStrategy for StripPreamble {
    fn name(&self) -> &'static str {
        "strip_preamble"
    }

    fn extract(&self, text: &str) -> Result<Value, StrategyError> {
        let stripped = scan::strip_wrapping(text);
        if stripped.is_empty() {
            return Err(StrategyError::NoCandidate);
        }
        parse_object(stripped)
    }
}

/// [`StripPreamble`] followed by trailing-comma removal
///
/// When the stripped text still carries prose after the JSON, the repaired
/// text's first balanced object is tried as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepairTrailingCommas;

impl ExtractionStrategy for RepairTrailingCommas {
    fn name(&self) -> &'static str {
        "repair_trailing_commas"
    }

    fn extract(&self, text: &str) -> Result<Value, StrategyError> {
        let stripped = scan::strip_wrapping(text);
        if stripped.is_empty() {
            return Err(StrategyError::NoCandidate);
        }
        let repaired = scan::remove_trailing_commas(stripped);
        let span = scan::balanced_object_span(&repaired).filter(|s| *s != repaired);
        first_object(std::iter::once(repaired.as_str()).chain(span))
    }
}

/// The five standard strategies, in order
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(WholeText),
        Box::new(FencedBlock),
        Box::new(BraceSpan),
        Box::new(StripPreamble),
        Box::new(RepairTrailingCommas),
    ]
}
