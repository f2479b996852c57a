//! `geojson-transform` is a small library (plus a thin CLI) for rewriting the properties
//! of GeoJSON features across whole directories, driven entirely by a declarative JSON
//! configuration rather than code.
//!
//! Each output property is derived from a feature's source properties by a small
//! recursive expression language with four rule forms:
//!
//! - **constant**: a fixed literal
//! - **property**: read a key from the source properties
//! - **join**: concatenate child rules with a delimiter, dropping falsy children and
//!   prefixing surviving ones with optional labels
//! - **map**: dispatch a child rule's result through a lookup table with a fallback
//!   default (used when the key misses *or* the table value is falsy)
//!
//! Derived values that are falsy (`null`, `false`, `0`, `""`) are omitted from the
//! output properties entirely; the optional `"omission": "null-only"` configuration
//! field relaxes this to dropping only `null`/absent values. Feature `type` and
//! `geometry` always pass through untouched; geometry is never interpreted.
//!
//! ## Quick example: transform one feature in memory
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
//!             ] } },
//!         { "name": "zone", "type": "map", "value": {
//!             "input": { "type": "property", "value": "use_code" },
//!             "map": { "R1": "residential" },
//!             "default": "unknown" } }
//!     ]
//! }"#)?;
//!
//! let feature: Feature = serde_json::from_str(r#"{
//!     "type": "Feature",
//!     "geometry": { "type": "Point", "coordinates": [-89.65, 39.78] },
//!     "properties": { "city": "Springfield", "state": "IL", "use_code": "R1" }
//! }"#).expect("valid feature");
//!
//! let out = transform_feature(&feature, &config.mapping);
//! assert_eq!(out.geometry, feature.geometry);
//! let props = out.properties.unwrap();
//! assert_eq!(props["title"], "Springfield - IL");
//! assert_eq!(props["zone"], "residential");
//! # Ok(())
//! # }
//! ```
//!
//! ## Batch runs over directories
//!
//! A configuration also names `(input, output)` directory pairs; [`batch::run_batch`]
//! resets each output directory and writes one transformed document per input document,
//! under the same file name:
//!
//! ```no_run
//! use geojson_transform::batch::{run_batch, BatchOptions};
//! use geojson_transform::config::load_config_from_path;
//!
//! # fn main() -> Result<(), geojson_transform::TransformError> {
//! let config = load_config_from_path("transform-config.json")?;
//! let summary = run_batch(&config, &BatchOptions::default())?;
//! println!(
//!     "wrote {} documents ({} features)",
//!     summary.documents_written, summary.features_transformed
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: configuration loading and rule compilation
//! - [`types`]: feature / feature-collection data model
//! - [`transform`]: the pure property-transformation engine
//! - [`document`]: reading and writing feature-collection documents
//! - [`batch`]: the directory batch orchestrator and its observer hooks
//! - [`error`]: error types used across the crate

pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod transform;
pub mod types;

pub use error::{TransformError, TransformResult};
