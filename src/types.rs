//! Core data model for GeoJSON feature documents.
//!
//! This crate treats documents as opaque structured data: a [`FeatureCollection`] is an
//! ordered sequence of [`Feature`]s, and a feature's `geometry` is carried as raw JSON that
//! is copied but never interpreted. Only `properties` is ever rewritten.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One geographic entity: a type tag, an opaque geometry, and a property mapping.
///
/// `geometry` is whatever JSON the source document carried (commonly an object, sometimes
/// `null`). `properties` may be `null` or missing on input; transformation always produces
/// an output object, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// The GeoJSON type tag, normally `"Feature"`. Passed through unchanged.
    #[serde(rename = "type")]
    pub kind: String,
    /// Opaque geometry JSON. Copied verbatim, never inspected.
    #[serde(default)]
    pub geometry: Value,
    /// String-keyed property mapping. `None` models a JSON `null` or absent member.
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// An ordered sequence of features, 1:1 with one document file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// The GeoJSON type tag, normally `"FeatureCollection"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Features in document order.
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create a collection from a feature list, with the standard type tag.
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    /// Number of features in the collection.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}
