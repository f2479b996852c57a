//! Reading and writing GeoJSON feature-collection documents.
//!
//! Each document is materialized in full; there is no streaming. Content that parses as
//! JSON but is not a feature collection is reported as [`TransformError::Document`], while
//! filesystem failures surface as [`TransformError::Io`].
//!
//! Extra members on the collection or on individual features (`bbox`, foreign members,
//! feature `id`s) are dropped: output documents are rebuilt from exactly `type`,
//! `geometry` and the new `properties`.

use std::fs;
use std::path::Path;

use crate::error::{TransformError, TransformResult};
use crate::types::FeatureCollection;

/// Read a feature-collection document from a file.
pub fn read_collection_from_path(path: impl AsRef<Path>) -> TransformResult<FeatureCollection> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    read_collection_from_str(&text).map_err(|e| match e {
        TransformError::Document { message } => TransformError::Document {
            message: format!("{}: {message}", path.display()),
        },
        other => other,
    })
}

/// Parse a feature-collection document from an in-memory string.
pub fn read_collection_from_str(input: &str) -> TransformResult<FeatureCollection> {
    serde_json::from_str(input).map_err(|e| TransformError::Document {
        message: e.to_string(),
    })
}

/// Write a feature-collection document to a file.
///
/// Output is compact single-line JSON, the same framing the documents are commonly
/// produced with upstream.
pub fn write_collection_to_path(
    path: impl AsRef<Path>,
    collection: &FeatureCollection,
) -> TransformResult<()> {
    let text = collection_to_string(collection)?;
    fs::write(path, text)?;
    Ok(())
}

/// Serialize a feature collection to compact JSON.
pub fn collection_to_string(collection: &FeatureCollection) -> TransformResult<String> {
    serde_json::to_string(collection).map_err(|e| TransformError::Document {
        message: e.to_string(),
    })
}
