//! Transforming one feature: new properties, everything else passed through.

use serde_json::Map;

use crate::config::PropertyMapping;
use crate::types::Feature;

use super::properties::build_properties;

/// Produce a new feature with the same type and geometry as `feature` and properties
/// rebuilt through `mapping`. The input is never mutated; geometry is copied verbatim.
pub fn transform_feature(feature: &Feature, mapping: &PropertyMapping) -> Feature {
    let empty = Map::new();
    let source = feature.properties.as_ref().unwrap_or(&empty);
    Feature {
        kind: feature.kind.clone(),
        geometry: feature.geometry.clone(),
        properties: Some(build_properties(mapping, source)),
    }
}
