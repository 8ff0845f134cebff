//! The `Algorithm` trait.
//!
//! An algorithm arrives as a tagged document whose model references are
//! resolved against a workspace at deserialization time; the constructed
//! instance therefore owns private copies of its inputs and `run()` is
//! self-contained. A long-running `run()` blocks only the connection it
//! arrived on.

use std::fmt;

use crate::document::TaggedDocument;
use crate::error::{AlgorithmError, DocumentError};
use crate::model::Model;
use crate::workspace::Workspace;

/// A runnable workbench algorithm.
pub trait Algorithm: Send + fmt::Debug {
    /// Type tag, matching the workspace's constructor registry.
    fn type_name(&self) -> &'static str;

    /// Serialize to the tagged-document form. Input models are written
    /// as name references, not inline.
    fn to_document(&self) -> Result<TaggedDocument, DocumentError>;

    /// Execute and return the produced result models, in order.
    fn run(&self) -> Result<Vec<Box<dyn Model>>, AlgorithmError>;
}

/// Constructor registered per type tag; resolves the description's model
/// references against the given workspace.
pub type AlgorithmDecoder =
    fn(&TaggedDocument, &Workspace) -> Result<Box<dyn Algorithm>, DocumentError>;
