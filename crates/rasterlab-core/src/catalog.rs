//! The catalog of known model, algorithm, and view constructors.
//!
//! The server holds one catalog, built at startup; every accepted
//! connection gets an independent [`Workspace`] snapshot of it. Snapshots
//! share nothing mutable with the catalog or with each other, which is
//! the isolation guarantee the whole concurrency model rests on.

use std::collections::BTreeMap;

use crate::algorithm::AlgorithmDecoder;
use crate::algorithms::{GradientField, PeakDetect, Threshold};
use crate::model::ModelDecoder;
use crate::models::{FeatureList, RasterImage, VectorField};
use crate::view::{self, ViewFn};
use crate::workspace::Workspace;

/// Registry of everything a workspace can deserialize and render.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    models: BTreeMap<String, ModelDecoder>,
    algorithms: BTreeMap<String, AlgorithmDecoder>,
    views: BTreeMap<String, ViewFn>,
}

impl Catalog {
    /// An empty catalog; useful for tests exercising unknown-type paths.
    pub fn empty() -> Self {
        Catalog::default()
    }

    /// The catalog of built-in types.
    pub fn builtin() -> Self {
        let mut catalog = Catalog::empty();

        catalog.register_model(RasterImage::TAG, RasterImage::decoder);
        catalog.register_model(VectorField::TAG, VectorField::decoder);
        catalog.register_model(FeatureList::TAG, FeatureList::decoder);

        catalog.register_algorithm(Threshold::TAG, Threshold::decoder);
        catalog.register_algorithm(GradientField::TAG, GradientField::decoder);
        catalog.register_algorithm(PeakDetect::TAG, PeakDetect::decoder);

        catalog.register_view(RasterImage::TAG, view::raster_summary);
        catalog.register_view(VectorField::TAG, view::vector_field_summary);
        catalog.register_view(FeatureList::TAG, view::feature_list_summary);

        catalog
    }

    pub fn register_model(&mut self, tag: &str, decoder: ModelDecoder) {
        self.models.insert(tag.to_string(), decoder);
    }

    pub fn register_algorithm(&mut self, tag: &str, decoder: AlgorithmDecoder) {
        self.algorithms.insert(tag.to_string(), decoder);
    }

    pub fn register_view(&mut self, tag: &str, render: ViewFn) {
        self.views.insert(tag.to_string(), render);
    }

    /// Produce an independent workspace: fresh registry copies and an
    /// empty model collection. The snapshot keeps no reference back to
    /// this catalog.
    pub fn snapshot(&self) -> Workspace {
        Workspace::from_registries(
            self.models.clone(),
            self.algorithms.clone(),
            self.views.clone(),
        )
    }
}
