//! Error types for document decoding and validation
//!
//! Every structural failure names the offending location as a
//! [`FieldPath`] using the same dotted syntax the path resolver accepts
//! (`sections.hero.components.0.type`).

use crate::breakpoint::Breakpoint;
use std::fmt::{self, Display, Formatter};

/// Dotted location inside a document
///
/// Sequence positions are rendered as plain integer segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Document root
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Append a key segment, returning a new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Append a positional segment, returning a new path
    #[inline]
    #[must_use]
    pub fn index(&self, position: usize) -> Self {
        self.child(position.to_string())
    }

    /// Path segments from root to leaf
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Check if this is the root path
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0.join("."))
        }
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Structural, type or enum violation in a document
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Input text is not valid JSON
    #[error("invalid JSON syntax: {0}")]
    Syntax(#[from] serde_json::Error),

    /// Document could not be encoded back to JSON
    #[error("document encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Value has the wrong JSON kind
    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
    },

    /// Required field is absent
    #[error("{path}: missing required field")]
    MissingField { path: FieldPath },

    /// String is not a member of a closed enumeration
    #[error("{path}: unknown {kind} '{value}' (expected one of: {allowed})")]
    UnknownVariant {
        path: FieldPath,
        kind: &'static str,
        value: String,
        allowed: String,
    },

    /// Breakpoint-keyed map lacks one of the six breakpoints
    #[error("{path}: missing breakpoint '{breakpoint}'")]
    MissingBreakpoint {
        path: FieldPath,
        breakpoint: Breakpoint,
    },

    /// Cross-field invariant violated
    #[error("{path}: {message}")]
    Invariant { path: FieldPath, message: String },
}

impl SchemaError {
    /// Create invariant violation at path
    pub fn invariant(path: FieldPath, message: impl Into<String>) -> Self {
        Self::Invariant {
            path,
            message: message.into(),
        }
    }

    /// Location of the violation, if it has one
    #[must_use]
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::Syntax(_) | Self::Encode(_) => None,
            Self::TypeMismatch { path, .. }
            | Self::MissingField { path }
            | Self::UnknownVariant { path, .. }
            | Self::MissingBreakpoint { path, .. }
            | Self::Invariant { path, .. } => Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_path_display() {
        let path = FieldPath::root().child("sections").child("hero").index(0);
        assert_eq!(path.to_string(), "sections.hero.0");
        assert_eq!(FieldPath::root().to_string(), "<root>");
    }

    #[test]
    fn field_path_from_iter() {
        let path: FieldPath = ["layout", "type"].into_iter().collect();
        assert_eq!(path.segments(), &["layout".to_string(), "type".to_string()]);
    }

    #[test]
    fn schema_error_names_path() {
        let err = SchemaError::MissingField {
            path: FieldPath::root().child("sections"),
        };
        assert_eq!(err.to_string(), "sections: missing required field");
        assert_eq!(err.path().map(ToString::to_string).as_deref(), Some("sections"));
    }

    #[test]
    fn missing_breakpoint_display() {
        let err = SchemaError::MissingBreakpoint {
            path: FieldPath::root().child("styles"),
            breakpoint: Breakpoint::MaxMd,
        };
        assert_eq!(err.to_string(), "styles: missing breakpoint 'max-md'");
    }
}
