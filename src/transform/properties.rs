//! Building one feature's output properties from the configured property mapping.

use serde_json::{Map, Value};

use crate::config::{OmissionPolicy, PropertyMapping};

use super::eval::{evaluate, is_truthy};

/// Apply every rule of `mapping` to `source`, in declared order.
///
/// Values the omission policy rejects are left out entirely; they never appear with a
/// null or empty placeholder. Output key order follows rule order for surviving keys;
/// a duplicate rule name overwrites the earlier value in place.
pub fn build_properties(mapping: &PropertyMapping, source: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for rule in &mapping.rules {
        let value = evaluate(&rule.spec, source);
        let keep = match mapping.omission {
            OmissionPolicy::Falsy => is_truthy(&value),
            OmissionPolicy::NullOnly => !value.is_null(),
        };
        if keep {
            out.insert(rule.name.clone(), value);
        }
    }
    out
}
