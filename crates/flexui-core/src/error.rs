//! Error types for flexui Core
//!
//! Provides error handling for:
//! - Oracle invocation (transport, upstream status, empty replies)
//! - The modification pipeline (one variant per taxonomy kind)
//! - Configuration loading

use flexui_extract::ExtractionError;
use flexui_schema::SchemaError;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Failure reported by an oracle implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// Request never produced an HTTP response
    #[error("oracle transport failed: {0}")]
    Transport(String),

    /// Upstream answered with a non-success status
    #[error("oracle returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Upstream answered without usable content
    #[error("oracle returned no content")]
    EmptyResponse,

    /// Credential environment variable is unset
    #[error("oracle credentials missing: environment variable {0} is not set")]
    MissingCredentials(String),

    /// Oracle did not answer in time
    #[error("oracle timed out after {0}s")]
    Timeout(u64),
}

impl OracleError {
    /// Create transport error from any displayable cause
    #[inline]
    pub fn transport(cause: impl Display) -> Self {
        Self::Transport(cause.to_string())
    }
}

/// Taxonomy kind of a failed modification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInputDocument,
    InvalidRequest,
    OracleError,
    ExtractionFailure,
    InvalidOutputDocument,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::InvalidInputDocument => "InvalidInputDocument",
            ErrorKind::InvalidRequest => "InvalidRequest",
            ErrorKind::OracleError => "OracleError",
            ErrorKind::ExtractionFailure => "ExtractionFailure",
            ErrorKind::InvalidOutputDocument => "InvalidOutputDocument",
        })
    }
}

/// A modification that was rejected
///
/// The caller's document is never modified; on any of these errors it is
/// still the current version.
#[derive(Debug, thiserror::Error)]
pub enum ModificationError {
    /// Input document failed schema validation (no oracle call was made)
    #[error("invalid input document: {0}")]
    InvalidInputDocument(#[source] SchemaError),

    /// Request envelope is unusable (no instruction)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Oracle invocation failed
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// No JSON object could be recovered from the oracle reply
    #[error("extraction failed: {0}")]
    ExtractionFailure(#[from] ExtractionError),

    /// Recovered document failed schema validation
    #[error("invalid output document: {0}")]
    InvalidOutputDocument(#[source] SchemaError),
}

impl ModificationError {
    /// Taxonomy kind of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInputDocument(_) => ErrorKind::InvalidInputDocument,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Oracle(_) => ErrorKind::OracleError,
            Self::ExtractionFailure(_) => ErrorKind::ExtractionFailure,
            Self::InvalidOutputDocument(_) => ErrorKind::InvalidOutputDocument,
        }
    }

    /// Check if re-invoking with the same input could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Oracle(_) | Self::ExtractionFailure(_))
    }

    /// Schema violation behind an input/output rejection
    #[must_use]
    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            Self::InvalidInputDocument(e) | Self::InvalidOutputDocument(e) => Some(e),
            _ => None,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for the config shape
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are out of range
    #[error("invalid config value: {0}")]
    Invalid(String),
}
