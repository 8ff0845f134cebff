//! One-line textual views of models.
//!
//! The desktop workbench renders models in GUI views; that layer is out of
//! scope here, but the operator console and the demo client still want a
//! readable summary per model, so the catalog carries a view registry of
//! plain render functions.

use crate::model::Model;
use crate::models::{FeatureList, RasterImage, VectorField};

/// Render function registered per type tag.
pub type ViewFn = fn(&dyn Model) -> String;

/// Fallback rendering for types without a registered view.
pub fn fallback(model: &dyn Model) -> String {
    format!("{} {:?}", model.type_name(), model.name())
}

pub fn raster_summary(model: &dyn Model) -> String {
    match model.as_any().downcast_ref::<RasterImage>() {
        Some(img) => format!("image {:?} {}x{}", img.name, img.width, img.height),
        None => fallback(model),
    }
}

pub fn vector_field_summary(model: &dyn Model) -> String {
    match model.as_any().downcast_ref::<VectorField>() {
        Some(field) => format!("vector field {:?} {}x{}", field.name, field.width, field.height),
        None => fallback(model),
    }
}

pub fn feature_list_summary(model: &dyn Model) -> String {
    match model.as_any().downcast_ref::<FeatureList>() {
        Some(list) => format!("{} features in {:?}", list.features.len(), list.name),
        None => fallback(model),
    }
}
