//! The property-transformation engine.
//!
//! Three pure layers, leaves first:
//!
//! - [`evaluate()`]: one transform rule against one feature's source properties
//! - [`build_properties()`]: a whole property mapping, applying the value-omission policy
//! - [`transform_feature()`]: a full feature, passing type and geometry through untouched
//!
//! Nothing here performs I/O or holds state; the batch layer drives these functions over
//! whole directories.
//!
//! ## Example
//!
//! ```rust
//! use geojson_transform::config::load_config_from_str;
//! use geojson_transform::transform::transform_feature;
//! use geojson_transform::types::Feature;
//!
//! # fn main() -> Result<(), geojson_transform::TransformError> {
//! let config = load_config_from_str(r#"{
//!     "properties": [
//!         { "name": "kind", "type": "constant", "value": "place" },
//!         { "name": "title", "type": "join", "value": {
//!             "delimiter": " - ",
//!             "values": [
//!                 { "type": "property", "value": "city" },
//!                 { "type": "property", "value": "state" }
//!             ] } }
//!     ]
//! }"#)?;
//!
//! let feature: Feature = serde_json::from_str(r#"{
//!     "type": "Feature",
//!     "geometry": null,
//!     "properties": { "city": "Springfield", "state": "IL" }
//! }"#).expect("valid feature");
//!
//! let out = transform_feature(&feature, &config.mapping);
//! let props = out.properties.unwrap();
//! assert_eq!(props["kind"], "place");
//! assert_eq!(props["title"], "Springfield - IL");
//! # Ok(())
//! # }
//! ```

pub mod eval;
pub mod feature;
pub mod properties;

pub use eval::{evaluate, is_truthy};
pub use feature::transform_feature;
pub use properties::build_properties;
