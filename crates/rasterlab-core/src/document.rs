//! The tagged-document representation of models and algorithms.
//!
//! A document is a type tag plus an opaque bag of fields. Everything that
//! crosses the wire is one of these, rendered to bytes; the protocol layer
//! compresses the bytes but never looks inside them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Serialized form of a model or algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedDocument {
    /// Type tag, resolved against a workspace's constructor registries.
    pub tag: String,

    /// The type's fields; schema is owned by the tagged type itself.
    pub fields: serde_json::Value,
}

impl TaggedDocument {
    /// Wrap a serializable value under the given type tag.
    pub fn encode<T: Serialize>(tag: &str, value: &T) -> Result<Self, DocumentError> {
        Ok(TaggedDocument {
            tag: tag.to_string(),
            fields: serde_json::to_value(value)?,
        })
    }

    /// Recover a typed value from the field bag.
    ///
    /// The caller is expected to have already dispatched on `tag`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DocumentError> {
        Ok(serde_json::from_value(self.fields.clone())?)
    }

    /// Render the document to its byte-stream form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse a document out of its byte-stream form.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, DocumentError> {
        Ok(serde_json::from_slice(buf)?)
    }
}
