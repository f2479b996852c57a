//! Configuration document loading and compilation.
//!
//! The configuration is a single JSON document naming directory pairs to process and an
//! ordered list of property rules. Raw rules are compiled into the closed [`TransformSpec`]
//! sum up front, so shape problems, unknown transform tags and runaway nesting are all
//! rejected at load time, before any document is touched.
//!
//! The loaded [`Config`] is immutable for the lifetime of a run and is passed by reference
//! to the pure transformation functions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{TransformError, TransformResult};

/// Upper bound on transform nesting.
///
/// Compiled specs are trees, so depth is the only way a configuration can run away;
/// anything past this limit is authoring gone wrong, not a real mapping. Kept low enough
/// that this named error fires before the JSON parser's own recursion limit.
pub const MAX_SPEC_DEPTH: usize = 32;

/// One configured (input, output) directory pair, processed as a batch unit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectorySet {
    /// Directory whose documents are read.
    pub input: PathBuf,
    /// Directory that is reset and filled with transformed documents.
    pub output: PathBuf,
}

/// Which derived values are dropped from output properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OmissionPolicy {
    /// Drop any falsy value: `null`, `false`, `0`, NaN, `""`.
    ///
    /// This reproduces the established behavior of existing configurations. A property
    /// whose legitimate derived value is `0` or `false` will not appear in the output.
    #[default]
    Falsy,
    /// Drop only `null`/absent values; `0`, `false` and `""` survive into the output.
    NullOnly,
}

/// A compiled transform rule: one node of the declarative transformation language.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformSpec {
    /// A fixed literal, independent of the source properties.
    Constant(Value),
    /// Read a key from the feature's source properties.
    Property(String),
    /// Evaluate each child, drop falsy results, prefix surviving ones with their label,
    /// and concatenate with the delimiter.
    Join {
        delimiter: String,
        children: Vec<JoinChild>,
    },
    /// Evaluate `input` to a key and dispatch through `table`, falling back to `default`
    /// when the key misses or the table value is falsy. Config tag: `"map"`.
    Lookup {
        input: Box<TransformSpec>,
        table: Map<String, Value>,
        default: Value,
    },
}

/// One operand of a [`TransformSpec::Join`], with an optional prefix label.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinChild {
    /// Prefix prepended to the stringified child value when the child survives.
    pub label: Option<String>,
    pub spec: TransformSpec,
}

/// An (output name, transform) pair. Order in the configuration is order in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRule {
    pub name: String,
    pub spec: TransformSpec,
}

/// The full ordered property mapping plus its omission policy.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMapping {
    pub rules: Vec<PropertyRule>,
    pub omission: OmissionPolicy,
}

/// A loaded, compiled configuration: directory pairs plus the property mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub directories: Vec<DirectorySet>,
    pub mapping: PropertyMapping,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    directories: Vec<DirectorySet>,
    #[serde(default)]
    omission: OmissionPolicy,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
struct RawProperty {
    name: String,
    #[serde(flatten)]
    spec: RawSpec,
}

/// An uncompiled transform node as it appears in the document: a tag, a payload, and
/// (on join operands) an optional label.
#[derive(Debug, Deserialize)]
struct RawSpec {
    #[serde(rename = "type")]
    tag: String,
    value: Value,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawJoin {
    delimiter: String,
    values: Vec<RawSpec>,
}

#[derive(Debug, Deserialize)]
struct RawLookup {
    input: RawSpec,
    map: Map<String, Value>,
    #[serde(default)]
    default: Value,
}

/// Load and compile a configuration document from a file.
pub fn load_config_from_path(path: impl AsRef<Path>) -> TransformResult<Config> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    load_config_from_str(&text).map_err(|e| match e {
        TransformError::Config { message } => TransformError::Config {
            message: format!("{}: {message}", path.display()),
        },
        other => other,
    })
}

/// Load and compile a configuration document from an in-memory string.
pub fn load_config_from_str(input: &str) -> TransformResult<Config> {
    let raw: RawConfig = serde_json::from_str(input).map_err(|e| TransformError::Config {
        message: e.to_string(),
    })?;

    let mut rules = Vec::with_capacity(raw.properties.len());
    for property in &raw.properties {
        let spec = compile_spec(&property.spec, 0).map_err(|e| match e {
            TransformError::Config { message } => TransformError::Config {
                message: format!("property '{}': {message}", property.name),
            },
            other => other,
        })?;
        rules.push(PropertyRule {
            name: property.name.clone(),
            spec,
        });
    }

    Ok(Config {
        directories: raw.directories,
        mapping: PropertyMapping {
            rules,
            omission: raw.omission,
        },
    })
}

fn compile_spec(raw: &RawSpec, depth: usize) -> TransformResult<TransformSpec> {
    if depth > MAX_SPEC_DEPTH {
        return Err(TransformError::Config {
            message: format!("transform nesting exceeds the depth limit of {MAX_SPEC_DEPTH}"),
        });
    }

    match raw.tag.as_str() {
        "constant" => Ok(TransformSpec::Constant(raw.value.clone())),
        "property" => match &raw.value {
            Value::String(key) => Ok(TransformSpec::Property(key.clone())),
            other => Err(TransformError::Config {
                message: format!("'property' value must be a source key string, got {other}"),
            }),
        },
        "join" => {
            let join: RawJoin =
                serde_json::from_value(raw.value.clone()).map_err(|e| TransformError::Config {
                    message: format!("bad 'join' value: {e}"),
                })?;
            let mut children = Vec::with_capacity(join.values.len());
            for child in &join.values {
                children.push(JoinChild {
                    label: child.label.clone(),
                    spec: compile_spec(child, depth + 1)?,
                });
            }
            Ok(TransformSpec::Join {
                delimiter: join.delimiter,
                children,
            })
        }
        "map" => {
            let lookup: RawLookup =
                serde_json::from_value(raw.value.clone()).map_err(|e| TransformError::Config {
                    message: format!("bad 'map' value: {e}"),
                })?;
            Ok(TransformSpec::Lookup {
                input: Box::new(compile_spec(&lookup.input, depth + 1)?),
                table: lookup.map,
                default: lookup.default,
            })
        }
        other => Err(TransformError::UnknownTransform {
            tag: other.to_string(),
        }),
    }
}
