//! Gzip payload codec over tagged documents.
//!
//! Bodies on the wire are the document byte stream wrapped in a generic
//! stream compressor; this module is the only place that knows which one.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use rasterlab_core::{Algorithm, Model, TaggedDocument};

use crate::codec::ProtocolError;

/// Compress a raw byte buffer for transmission.
pub fn compress(raw: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raw)?;
    Ok(encoder.finish()?)
}

/// Decompress a received body back into raw document bytes.
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let mut decoder = GzDecoder::new(compressed);
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    Ok(raw)
}

/// Serialize and compress a model into its wire body.
pub fn encode_model(model: &dyn Model) -> Result<Vec<u8>, ProtocolError> {
    compress(&model.to_document()?.to_bytes()?)
}

/// Serialize and compress an algorithm description into its wire body.
pub fn encode_algorithm(algorithm: &dyn Algorithm) -> Result<Vec<u8>, ProtocolError> {
    compress(&algorithm.to_document()?.to_bytes()?)
}

/// Decompress and parse a received body into a tagged document.
///
/// Resolving the document against a workspace is the receiver's business.
pub fn decode_document(compressed: &[u8]) -> Result<TaggedDocument, ProtocolError> {
    Ok(TaggedDocument::from_bytes(&decompress(compressed)?)?)
}
