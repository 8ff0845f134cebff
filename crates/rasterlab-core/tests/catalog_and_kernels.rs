// Domain-layer scenarios: document round-trips, snapshot isolation,
// reference resolution, and the built-in kernels.

use rasterlab_core::{
    Algorithm, Catalog, DocumentError, Feature, FeatureList, GradientField, Model, PeakDetect,
    RasterImage, TaggedDocument, Threshold, VectorField,
};

fn ramp_image(name: &str) -> RasterImage {
    // 4x3 ramp: pixel value == column index.
    let pixels = (0..12).map(|i| (i % 4) as f32).collect();
    RasterImage::new(name, 4, 3, pixels)
}

#[test]
fn raster_image_round_trips_through_document_bytes() {
    let image = ramp_image("input");
    let bytes = image.to_document().unwrap().to_bytes().unwrap();

    let doc = TaggedDocument::from_bytes(&bytes).unwrap();
    assert_eq!(doc.tag, RasterImage::TAG);

    let back = RasterImage::from_document(&doc).unwrap();
    assert_eq!(back, image);

    // An ingested model exports the same document it arrived as.
    let workspace = Catalog::builtin().snapshot();
    workspace.ingest_document(&doc).unwrap();
    assert_eq!(workspace.export_model("input").unwrap(), doc);
}

#[test]
fn vector_field_and_feature_list_round_trip() {
    let field = VectorField::new("field", 2, 1, vec![[1.0, 0.0], [0.0, -1.0]]);
    let doc = field.to_document().unwrap();
    assert_eq!(VectorField::from_document(&doc).unwrap(), field);

    let list = FeatureList::new(
        "peaks",
        vec![Feature {
            label: "p0".to_string(),
            x: 1.0,
            y: 2.0,
            strength: 9.5,
        }],
    );
    let doc = list.to_document().unwrap();
    assert_eq!(FeatureList::from_document(&doc).unwrap(), list);
}

#[test]
fn raster_image_rejects_mismatched_pixel_count() {
    let mut doc = ramp_image("bad").to_document().unwrap();
    doc.fields["width"] = serde_json::json!(99);

    match RasterImage::from_document(&doc) {
        Err(DocumentError::InvalidField("pixels")) => {}
        other => panic!("expected InvalidField(pixels), got {:?}", other),
    }
}

#[test]
fn workspace_rejects_unknown_type_tags() {
    let workspace = Catalog::empty().snapshot();
    let doc = ramp_image("input").to_document().unwrap();

    match workspace.ingest_document(&doc) {
        Err(DocumentError::UnknownType(tag)) => assert_eq!(tag, RasterImage::TAG),
        other => panic!("expected UnknownType, got {:?}", other),
    }
}

#[test]
fn snapshots_share_nothing() {
    let catalog = Catalog::builtin();
    let first = catalog.snapshot();
    let second = catalog.snapshot();

    first.insert_model(Box::new(ramp_image("mine")));

    assert_eq!(first.model_count(), 1);
    assert_eq!(second.model_count(), 0);
    assert_eq!(catalog.snapshot().model_count(), 0);
}

#[test]
fn algorithm_decode_resolves_model_references() {
    let workspace = Catalog::builtin().snapshot();
    let image = ramp_image("input");
    workspace.insert_model(Box::new(image.clone()));

    let doc = Threshold::new(image, "binary", 2.0).to_document().unwrap();
    let algorithm = workspace.decode_algorithm(&doc).unwrap();
    let results = algorithm.run().unwrap();

    assert_eq!(results.len(), 1);
    let out = results[0]
        .as_any()
        .downcast_ref::<RasterImage>()
        .expect("threshold output should be an image");
    assert_eq!(out.name, "binary");
    // Columns 0 and 1 fall below the level, 2 and 3 at or above it.
    assert_eq!(&out.pixels[0..4], &[0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn algorithm_decode_fails_on_unresolved_reference() {
    let workspace = Catalog::builtin().snapshot();
    let doc = Threshold::new(ramp_image("missing"), "out", 1.0)
        .to_document()
        .unwrap();

    match workspace.decode_algorithm(&doc) {
        Err(DocumentError::UnresolvedReference(name)) => assert_eq!(name, "missing"),
        other => panic!("expected UnresolvedReference, got {:?}", other),
    }
}

#[test]
fn algorithm_decode_fails_on_wrong_model_type() {
    let workspace = Catalog::builtin().snapshot();
    workspace.insert_model(Box::new(FeatureList::new("input", Vec::new())));

    let doc = Threshold::new(ramp_image("input"), "out", 1.0)
        .to_document()
        .unwrap();

    match workspace.decode_algorithm(&doc) {
        Err(DocumentError::WrongModelType { reference, .. }) => assert_eq!(reference, "input"),
        other => panic!("expected WrongModelType, got {:?}", other),
    }
}

#[test]
fn reference_resolution_prefers_latest_model() {
    let workspace = Catalog::builtin().snapshot();
    workspace.insert_model(Box::new(RasterImage::new("input", 1, 1, vec![1.0])));
    workspace.insert_model(Box::new(RasterImage::new("input", 1, 1, vec![7.0])));

    let resolved: RasterImage = workspace.require_model("input").unwrap();
    assert_eq!(resolved.pixels, vec![7.0]);
}

#[test]
fn gradient_field_produces_field_then_magnitude() {
    let image = RasterImage::new("input", 2, 2, vec![0.0, 1.0, 0.0, 1.0]);
    let results = GradientField::new(image, "grad").run().unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name(), "grad");
    assert_eq!(results[1].name(), "grad.magnitude");

    let field = results[0]
        .as_any()
        .downcast_ref::<VectorField>()
        .expect("first result should be the vector field");
    // dx at (0,0) is 1.0, dy is 0.0.
    assert_eq!(field.vectors[0], [1.0, 0.0]);

    let magnitude = results[1]
        .as_any()
        .downcast_ref::<RasterImage>()
        .expect("second result should be the magnitude image");
    assert_eq!(magnitude.pixels[0], 1.0);
}

#[test]
fn peak_detect_finds_the_local_maximum() {
    let mut pixels = vec![0.0f32; 9];
    pixels[4] = 5.0; // center of a 3x3
    let image = RasterImage::new("input", 3, 3, pixels);

    let results = PeakDetect::new(image, "peaks", 1.0).run().unwrap();
    let list = results[0]
        .as_any()
        .downcast_ref::<FeatureList>()
        .expect("peak output should be a feature list");

    assert_eq!(list.features.len(), 1);
    assert_eq!((list.features[0].x, list.features[0].y), (1.0, 1.0));
    assert_eq!(list.features[0].strength, 5.0);
}

#[test]
fn peak_detect_rejects_negative_threshold() {
    let image = ramp_image("input");
    assert!(PeakDetect::new(image, "peaks", -1.0).run().is_err());
}

#[test]
fn views_render_one_line_summaries() {
    let workspace = Catalog::builtin().snapshot();
    workspace.insert_model(Box::new(ramp_image("scene")));
    workspace.insert_model(Box::new(FeatureList::new("peaks", Vec::new())));

    assert_eq!(
        workspace.render_model("scene").unwrap(),
        "image \"scene\" 4x3"
    );
    assert_eq!(
        workspace.render_model("peaks").unwrap(),
        "0 features in \"peaks\""
    );
    assert!(workspace.render_model("absent").is_none());
}
