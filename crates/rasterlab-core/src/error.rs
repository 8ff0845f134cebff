//! Error types for the domain layer.
//!
//! `DocumentError` covers everything that can go wrong while turning a
//! tagged document back into a live model or algorithm; `AlgorithmError`
//! covers failures inside `run()` itself. The protocol layer maps both
//! onto the same `Error:0` ack, so the distinction matters only for
//! server-side logging.

use thiserror::Error;

/// Failure while encoding or decoding a tagged document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The byte stream is not a well-formed document.
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document's type tag is not registered in the workspace.
    #[error("unknown type tag: {0:?}")]
    UnknownType(String),

    /// A field violates the type's shape constraints.
    #[error("invalid field: {0}")]
    InvalidField(&'static str),

    /// An algorithm description references a model that is not present
    /// in the workspace it is being deserialized into.
    #[error("unresolved model reference: {0:?}")]
    UnresolvedReference(String),

    /// A referenced model exists but has the wrong type.
    #[error("model {reference:?} is a {actual}, expected {expected}")]
    WrongModelType {
        reference: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Failure inside an algorithm's `run()`.
#[derive(Debug, Error)]
pub enum AlgorithmError {
    /// A parameter is outside the range the kernel accepts.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// The kernel could not produce a result from its inputs.
    #[error("execution failed: {0}")]
    Failed(String),
}
