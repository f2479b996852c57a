//! Recursive evaluation of one transform rule against a feature's source properties.

use serde_json::{Map, Value};

use crate::config::{JoinChild, TransformSpec};

/// Generic boolean coercion shared by join filtering, lookup fallback and value omission.
///
/// `null` (also standing in for "absent"), `false`, numeric zero, NaN and the empty
/// string are falsy; everything else is truthy, including empty arrays and objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Evaluate a transform rule. Pure: depends only on the rule and the source properties.
///
/// `Value::Null` doubles as the "absent" result; builders upstream decide whether a
/// falsy result is omitted from the output.
pub fn evaluate(spec: &TransformSpec, source: &Map<String, Value>) -> Value {
    match spec {
        TransformSpec::Constant(value) => value.clone(),
        TransformSpec::Property(key) => source.get(key).cloned().unwrap_or(Value::Null),
        TransformSpec::Join {
            delimiter,
            children,
        } => Value::String(join_children(children, delimiter, source)),
        TransformSpec::Lookup {
            input,
            table,
            default,
        } => {
            let key = evaluate(input, source);
            if key.is_null() {
                // No key to dispatch on.
                return default.clone();
            }
            match table.get(&coerce_to_string(&key)) {
                // A present-but-falsy table value falls back exactly like a missing key.
                Some(value) if is_truthy(value) => value.clone(),
                _ => default.clone(),
            }
        }
    }
}

fn join_children(children: &[JoinChild], delimiter: &str, source: &Map<String, Value>) -> String {
    let mut parts = Vec::with_capacity(children.len());
    for child in children {
        let value = evaluate(&child.spec, source);
        // Falsy children vanish entirely: no empty delimiter slot.
        if !is_truthy(&value) {
            continue;
        }
        let text = coerce_to_string(&value);
        parts.push(match &child.label {
            Some(label) => format!("{label}{text}"),
            None => text,
        });
    }
    parts.join(delimiter)
}

/// String form used for join segments and lookup keys: strings pass through unchanged,
/// everything else renders as compact JSON.
fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
