//! Built-in algorithm kernels.
//!
//! Deliberately small: the remote execution protocol treats algorithms as
//! opaque things with a `run()`, so these exist to give the registries and
//! the tests something real to execute, not to be a serious image-
//! processing library.
//!
//! Each kernel has a private `*Desc` struct describing its wire form:
//! input models are referenced by name and resolved against the target
//! workspace when the description is deserialized.

use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::document::TaggedDocument;
use crate::error::{AlgorithmError, DocumentError};
use crate::model::Model;
use crate::models::{Feature, FeatureList, RasterImage, VectorField};
use crate::workspace::Workspace;

/// Binarize an image against a fixed level.
///
/// Produces one `RasterImage` whose samples are `0.0` or `1.0`.
#[derive(Debug, Clone)]
pub struct Threshold {
    pub input: RasterImage,
    pub output: String,
    pub level: f32,
}

#[derive(Serialize, Deserialize)]
struct ThresholdDesc {
    input: String,
    output: String,
    level: f32,
}

impl Threshold {
    pub const TAG: &'static str = "Threshold";

    pub fn new(input: RasterImage, output: impl Into<String>, level: f32) -> Self {
        Threshold {
            input,
            output: output.into(),
            level,
        }
    }

    pub fn from_document(doc: &TaggedDocument, workspace: &Workspace) -> Result<Self, DocumentError> {
        let desc: ThresholdDesc = doc.decode()?;
        let input = workspace.require_model::<RasterImage>(&desc.input)?;
        Ok(Threshold {
            input,
            output: desc.output,
            level: desc.level,
        })
    }

    pub fn decoder(
        doc: &TaggedDocument,
        workspace: &Workspace,
    ) -> Result<Box<dyn Algorithm>, DocumentError> {
        Ok(Box::new(Self::from_document(doc, workspace)?))
    }
}

impl Algorithm for Threshold {
    fn type_name(&self) -> &'static str {
        Self::TAG
    }

    fn to_document(&self) -> Result<TaggedDocument, DocumentError> {
        TaggedDocument::encode(
            Self::TAG,
            &ThresholdDesc {
                input: self.input.name.clone(),
                output: self.output.clone(),
                level: self.level,
            },
        )
    }

    fn run(&self) -> Result<Vec<Box<dyn Model>>, AlgorithmError> {
        if !self.level.is_finite() {
            return Err(AlgorithmError::InvalidParameter("level"));
        }
        let pixels = self
            .input
            .pixels
            .iter()
            .map(|&p| if p >= self.level { 1.0 } else { 0.0 })
            .collect();
        let out = RasterImage::new(
            self.output.clone(),
            self.input.width,
            self.input.height,
            pixels,
        );
        Ok(vec![Box::new(out)])
    }
}

/// Forward-difference gradient of an image.
///
/// Produces two models: the `VectorField` of `(dx, dy)` samples named
/// `<output>`, and the `RasterImage` of gradient magnitudes named
/// `<output>.magnitude`.
#[derive(Debug, Clone)]
pub struct GradientField {
    pub input: RasterImage,
    pub output: String,
}

#[derive(Serialize, Deserialize)]
struct GradientFieldDesc {
    input: String,
    output: String,
}

impl GradientField {
    pub const TAG: &'static str = "GradientField";

    pub fn new(input: RasterImage, output: impl Into<String>) -> Self {
        GradientField {
            input,
            output: output.into(),
        }
    }

    pub fn from_document(doc: &TaggedDocument, workspace: &Workspace) -> Result<Self, DocumentError> {
        let desc: GradientFieldDesc = doc.decode()?;
        let input = workspace.require_model::<RasterImage>(&desc.input)?;
        Ok(GradientField {
            input,
            output: desc.output,
        })
    }

    pub fn decoder(
        doc: &TaggedDocument,
        workspace: &Workspace,
    ) -> Result<Box<dyn Algorithm>, DocumentError> {
        Ok(Box::new(Self::from_document(doc, workspace)?))
    }
}

impl Algorithm for GradientField {
    fn type_name(&self) -> &'static str {
        Self::TAG
    }

    fn to_document(&self) -> Result<TaggedDocument, DocumentError> {
        TaggedDocument::encode(
            Self::TAG,
            &GradientFieldDesc {
                input: self.input.name.clone(),
                output: self.output.clone(),
            },
        )
    }

    fn run(&self) -> Result<Vec<Box<dyn Model>>, AlgorithmError> {
        let (w, h) = (self.input.width, self.input.height);
        let mut vectors = Vec::with_capacity((w as usize) * (h as usize));
        let mut magnitude = Vec::with_capacity(vectors.capacity());

        for y in 0..h {
            for x in 0..w {
                let here = self.input.at(x, y);
                let dx = if x + 1 < w { self.input.at(x + 1, y) - here } else { 0.0 };
                let dy = if y + 1 < h { self.input.at(x, y + 1) - here } else { 0.0 };
                vectors.push([dx, dy]);
                magnitude.push((dx * dx + dy * dy).sqrt());
            }
        }

        let field = VectorField::new(self.output.clone(), w, h, vectors);
        let mag = RasterImage::new(format!("{}.magnitude", self.output), w, h, magnitude);
        Ok(vec![Box::new(field), Box::new(mag)])
    }
}

/// Local-maximum detector.
///
/// Produces one `FeatureList` with an entry per strict 4-neighborhood
/// maximum whose sample is at least `min_strength`.
#[derive(Debug, Clone)]
pub struct PeakDetect {
    pub input: RasterImage,
    pub output: String,
    pub min_strength: f32,
}

#[derive(Serialize, Deserialize)]
struct PeakDetectDesc {
    input: String,
    output: String,
    min_strength: f32,
}

impl PeakDetect {
    pub const TAG: &'static str = "PeakDetect";

    pub fn new(input: RasterImage, output: impl Into<String>, min_strength: f32) -> Self {
        PeakDetect {
            input,
            output: output.into(),
            min_strength,
        }
    }

    pub fn from_document(doc: &TaggedDocument, workspace: &Workspace) -> Result<Self, DocumentError> {
        let desc: PeakDetectDesc = doc.decode()?;
        let input = workspace.require_model::<RasterImage>(&desc.input)?;
        Ok(PeakDetect {
            input,
            output: desc.output,
            min_strength: desc.min_strength,
        })
    }

    pub fn decoder(
        doc: &TaggedDocument,
        workspace: &Workspace,
    ) -> Result<Box<dyn Algorithm>, DocumentError> {
        Ok(Box::new(Self::from_document(doc, workspace)?))
    }
}

impl Algorithm for PeakDetect {
    fn type_name(&self) -> &'static str {
        Self::TAG
    }

    fn to_document(&self) -> Result<TaggedDocument, DocumentError> {
        TaggedDocument::encode(
            Self::TAG,
            &PeakDetectDesc {
                input: self.input.name.clone(),
                output: self.output.clone(),
                min_strength: self.min_strength,
            },
        )
    }

    fn run(&self) -> Result<Vec<Box<dyn Model>>, AlgorithmError> {
        if self.min_strength < 0.0 {
            return Err(AlgorithmError::InvalidParameter("min_strength"));
        }

        let (w, h) = (self.input.width, self.input.height);
        let mut features = Vec::new();

        for y in 0..h {
            for x in 0..w {
                let here = self.input.at(x, y);
                if here < self.min_strength {
                    continue;
                }
                let mut is_peak = true;
                if x > 0 && self.input.at(x - 1, y) >= here {
                    is_peak = false;
                }
                if is_peak && x + 1 < w && self.input.at(x + 1, y) >= here {
                    is_peak = false;
                }
                if is_peak && y > 0 && self.input.at(x, y - 1) >= here {
                    is_peak = false;
                }
                if is_peak && y + 1 < h && self.input.at(x, y + 1) >= here {
                    is_peak = false;
                }
                if is_peak {
                    features.push(Feature {
                        label: format!("p{}", features.len()),
                        x: x as f32,
                        y: y as f32,
                        strength: here,
                    });
                }
            }
        }

        Ok(vec![Box::new(FeatureList::new(self.output.clone(), features))])
    }
}
