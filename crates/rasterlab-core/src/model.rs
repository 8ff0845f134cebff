//! The `Model` trait.
//!
//! A model is any in-memory data object the workbench can hold in a
//! workspace: an image, a vector field, a feature list. The remote
//! execution protocol needs exactly three things from a model:
//! a type tag, an instance name, and a round-trippable document form.

use std::any::Any;
use std::fmt;

use crate::document::TaggedDocument;
use crate::error::DocumentError;

/// An in-memory workbench data object.
pub trait Model: Send + fmt::Debug {
    /// Type tag, matching the workspace's constructor registry.
    fn type_name(&self) -> &'static str;

    /// Instance name. Models inside one workspace are addressed by name;
    /// algorithm descriptions reference their inputs by it.
    fn name(&self) -> &str;

    /// Serialize to the tagged-document form.
    fn to_document(&self) -> Result<TaggedDocument, DocumentError>;

    /// Escape hatch for kernels that need the concrete type back.
    fn as_any(&self) -> &dyn Any;
}

/// Constructor registered per type tag; turns a document back into a model.
pub type ModelDecoder = fn(&TaggedDocument) -> Result<Box<dyn Model>, DocumentError>;
