//! rasterlab-core
//!
//! Pure workbench domain logic:
//! - tagged documents (the serialized form of models and algorithms)
//! - the `Model` and `Algorithm` traits plus the built-in types
//! - the catalog of known constructors
//! - per-connection workspace snapshots

pub mod document;
pub mod model;
pub mod models;
pub mod algorithm;
pub mod algorithms;
pub mod catalog;
pub mod workspace;
pub mod view;
pub mod error;

pub use document::TaggedDocument;

pub use model::Model;
pub use models::{Feature, FeatureList, RasterImage, VectorField};

pub use algorithm::Algorithm;
pub use algorithms::{GradientField, PeakDetect, Threshold};

pub use catalog::Catalog;
pub use workspace::Workspace;
pub use view::ViewFn;
pub use error::{AlgorithmError, DocumentError};
