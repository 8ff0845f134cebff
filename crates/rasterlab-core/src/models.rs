//! Built-in model types.
//!
//! These are the concrete data objects the built-in algorithm kernels
//! consume and produce. Each one round-trips exactly through its tagged
//! document, which is what the protocol tests lean on.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::document::TaggedDocument;
use crate::error::DocumentError;
use crate::model::Model;

/// Single-band raster image, row-major `f32` samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<f32>,
}

impl RasterImage {
    pub const TAG: &'static str = "RasterImage";

    pub fn new(name: impl Into<String>, width: u32, height: u32, pixels: Vec<f32>) -> Self {
        RasterImage {
            name: name.into(),
            width,
            height,
            pixels,
        }
    }

    /// Sample at `(x, y)`; caller guarantees bounds.
    pub fn at(&self, x: u32, y: u32) -> f32 {
        self.pixels[(y * self.width + x) as usize]
    }

    fn validate(&self) -> Result<(), DocumentError> {
        if self.pixels.len() != (self.width as usize) * (self.height as usize) {
            return Err(DocumentError::InvalidField("pixels"));
        }
        Ok(())
    }

    pub fn from_document(doc: &TaggedDocument) -> Result<Self, DocumentError> {
        let image: RasterImage = doc.decode()?;
        image.validate()?;
        Ok(image)
    }

    pub fn decoder(doc: &TaggedDocument) -> Result<Box<dyn Model>, DocumentError> {
        Ok(Box::new(Self::from_document(doc)?))
    }
}

impl Model for RasterImage {
    fn type_name(&self) -> &'static str {
        Self::TAG
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_document(&self) -> Result<TaggedDocument, DocumentError> {
        TaggedDocument::encode(Self::TAG, self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Dense 2-D vector field, row-major `(dx, dy)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorField {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub vectors: Vec<[f32; 2]>,
}

impl VectorField {
    pub const TAG: &'static str = "VectorField";

    pub fn new(name: impl Into<String>, width: u32, height: u32, vectors: Vec<[f32; 2]>) -> Self {
        VectorField {
            name: name.into(),
            width,
            height,
            vectors,
        }
    }

    fn validate(&self) -> Result<(), DocumentError> {
        if self.vectors.len() != (self.width as usize) * (self.height as usize) {
            return Err(DocumentError::InvalidField("vectors"));
        }
        Ok(())
    }

    pub fn from_document(doc: &TaggedDocument) -> Result<Self, DocumentError> {
        let field: VectorField = doc.decode()?;
        field.validate()?;
        Ok(field)
    }

    pub fn decoder(doc: &TaggedDocument) -> Result<Box<dyn Model>, DocumentError> {
        Ok(Box::new(Self::from_document(doc)?))
    }
}

impl Model for VectorField {
    fn type_name(&self) -> &'static str {
        Self::TAG
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_document(&self) -> Result<TaggedDocument, DocumentError> {
        TaggedDocument::encode(Self::TAG, self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One detected feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub strength: f32,
}

/// Sparse list of detected features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureList {
    pub name: String,
    pub features: Vec<Feature>,
}

impl FeatureList {
    pub const TAG: &'static str = "FeatureList";

    pub fn new(name: impl Into<String>, features: Vec<Feature>) -> Self {
        FeatureList {
            name: name.into(),
            features,
        }
    }

    pub fn from_document(doc: &TaggedDocument) -> Result<Self, DocumentError> {
        doc.decode()
    }

    pub fn decoder(doc: &TaggedDocument) -> Result<Box<dyn Model>, DocumentError> {
        Ok(Box::new(Self::from_document(doc)?))
    }
}

impl Model for FeatureList {
    fn type_name(&self) -> &'static str {
        Self::TAG
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_document(&self) -> Result<TaggedDocument, DocumentError> {
        TaggedDocument::encode(Self::TAG, self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
