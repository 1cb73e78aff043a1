//! Document fingerprints
//!
//! Provides [`DocumentHash`], a Blake3 hash over the serialized document.
//! Serialization order is deterministic (sections and maps keep document
//! order), so equal documents always hash equally.

use crate::document::FlexibleContent;
use crate::error::SchemaError;
use std::fmt::{self, Display, Formatter};

/// A 32-byte document fingerprint (Blake3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentHash([u8; 32]);

impl DocumentHash {
    /// Create from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hash arbitrary bytes
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Fingerprint a document
    ///
    /// # Errors
    /// Returns [`SchemaError::Encode`] if the document cannot be serialized
    pub fn of(document: &FlexibleContent) -> Result<Self, SchemaError> {
        let bytes = serde_json::to_vec(document).map_err(SchemaError::Encode)?;
        Ok(Self::compute(&bytes))
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for DocumentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl serde::Serialize for DocumentHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
