//! Per-connection workspace snapshots.
//!
//! A workspace is what one connection deserializes into and runs against:
//! the constructor registries copied from the catalog plus that
//! connection's own ordered model collection. The collection sits behind a
//! mutex so that deserialization side effects and any future concurrent
//! operations on a single workspace stay serialized; workspaces of
//! different connections share nothing.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::algorithm::{Algorithm, AlgorithmDecoder};
use crate::document::TaggedDocument;
use crate::error::DocumentError;
use crate::model::{Model, ModelDecoder};
use crate::view::{self, ViewFn};

/// One connection's private universe of types and models.
#[derive(Debug)]
pub struct Workspace {
    model_decoders: BTreeMap<String, ModelDecoder>,
    algorithm_decoders: BTreeMap<String, AlgorithmDecoder>,
    views: BTreeMap<String, ViewFn>,
    models: Mutex<Vec<Box<dyn Model>>>,
}

impl Workspace {
    pub(crate) fn from_registries(
        model_decoders: BTreeMap<String, ModelDecoder>,
        algorithm_decoders: BTreeMap<String, AlgorithmDecoder>,
        views: BTreeMap<String, ViewFn>,
    ) -> Self {
        Workspace {
            model_decoders,
            algorithm_decoders,
            views,
            models: Mutex::new(Vec::new()),
        }
    }

    fn collection(&self) -> MutexGuard<'_, Vec<Box<dyn Model>>> {
        self.models.lock().expect("workspace model lock poisoned")
    }

    /// Decode a model document against this workspace's registry.
    pub fn decode_model(&self, doc: &TaggedDocument) -> Result<Box<dyn Model>, DocumentError> {
        let decoder = self
            .model_decoders
            .get(&doc.tag)
            .ok_or_else(|| DocumentError::UnknownType(doc.tag.clone()))?;
        decoder(doc)
    }

    /// Decode an algorithm description, resolving its model references
    /// against the models already present here.
    pub fn decode_algorithm(
        &self,
        doc: &TaggedDocument,
    ) -> Result<Box<dyn Algorithm>, DocumentError> {
        let decoder = self
            .algorithm_decoders
            .get(&doc.tag)
            .ok_or_else(|| DocumentError::UnknownType(doc.tag.clone()))?;
        decoder(doc, self)
    }

    /// Decode and add a model in one step; returns the model's name.
    pub fn ingest_document(&self, doc: &TaggedDocument) -> Result<String, DocumentError> {
        let model = self.decode_model(doc)?;
        let name = model.name().to_string();
        self.insert_model(model);
        Ok(name)
    }

    /// Append a model to the collection.
    pub fn insert_model(&self, model: Box<dyn Model>) {
        self.collection().push(model);
    }

    pub fn model_count(&self) -> usize {
        self.collection().len()
    }

    /// Names in insertion order.
    pub fn model_names(&self) -> Vec<String> {
        self.collection().iter().map(|m| m.name().to_string()).collect()
    }

    /// Typed copy of the most recently inserted model with this name.
    pub fn require_model<T>(&self, name: &str) -> Result<T, DocumentError>
    where
        T: Model + Clone + 'static,
    {
        let models = self.collection();
        let found = models
            .iter()
            .rev()
            .find(|m| m.name() == name)
            .ok_or_else(|| DocumentError::UnresolvedReference(name.to_string()))?;
        found
            .as_any()
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| DocumentError::WrongModelType {
                reference: name.to_string(),
                expected: short_type_name::<T>(),
                actual: found.type_name(),
            })
    }

    /// Serialized form of the named model, if present.
    pub fn export_model(&self, name: &str) -> Result<TaggedDocument, DocumentError> {
        let models = self.collection();
        let found = models
            .iter()
            .rev()
            .find(|m| m.name() == name)
            .ok_or_else(|| DocumentError::UnresolvedReference(name.to_string()))?;
        found.to_document()
    }

    /// One-line rendering through the view registry.
    pub fn render(&self, model: &dyn Model) -> String {
        match self.views.get(model.type_name()) {
            Some(render) => render(model),
            None => view::fallback(model),
        }
    }

    /// Rendering of the named model, if present.
    pub fn render_model(&self, name: &str) -> Option<String> {
        let models = self.collection();
        models
            .iter()
            .rev()
            .find(|m| m.name() == name)
            .map(|m| match self.views.get(m.type_name()) {
                Some(render) => render(m.as_ref()),
                None => view::fallback(m.as_ref()),
            })
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
