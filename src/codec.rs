//! Conversion between the container tree and JSON/YAML documents.
//!
//! Numbers travel as `f64` both ways; a whole number is emitted as an
//! integer. Scalar YAML keys are stringified, non-scalar YAML keys are
//! skipped, and tagged YAML values are unwrapped.

use im::HashMap;

use crate::error::BurrowError;
use crate::tree::Value;

// ============================================================================
// JSON
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<HashMap<_, _>>(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < i64::MAX as f64 {
        return serde_json::Value::Number(serde_json::Number::from(n as i64));
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// Decodes a JSON document into a tree.
pub fn from_json_str(source: &str) -> Result<Value, BurrowError> {
    let json: serde_json::Value = serde_json::from_str(source)?;
    Ok(Value::from(json))
}

/// Encodes a tree as a compact JSON document.
pub fn to_json_string(value: &Value) -> Result<String, BurrowError> {
    Ok(serde_json::to_string(&serde_json::Value::from(value))?)
}

/// Encodes a tree as a pretty-printed JSON document.
pub fn to_json_string_pretty(value: &Value) -> Result<String, BurrowError> {
    Ok(serde_json::to_string_pretty(&serde_json::Value::from(value))?)
}

// ============================================================================
// YAML
// ============================================================================

impl From<serde_yaml::Value> for Value {
    fn from(yaml: serde_yaml::Value) -> Self {
        match yaml {
            serde_yaml::Value::Null => Value::Nil,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_yaml::Value::Mapping(entries) => {
                let mut map = HashMap::new();
                for (key, value) in entries {
                    let Some(key) = yaml_key_to_string(&key) else {
                        continue;
                    };
                    map.insert(key, Value::from(value));
                }
                Value::Map(map)
            }
            serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

fn yaml_key_to_string(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Null => Some("null".to_string()),
        _ => None,
    }
}

impl From<&Value> for serde_yaml::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Nil => serde_yaml::Value::Null,
            Value::Bool(b) => serde_yaml::Value::Bool(*b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < i64::MAX as f64 {
                    serde_yaml::Value::Number(serde_yaml::Number::from(*n as i64))
                } else {
                    serde_yaml::Value::Number(serde_yaml::Number::from(*n))
                }
            }
            Value::String(s) => serde_yaml::Value::String(s.clone()),
            Value::List(items) => {
                serde_yaml::Value::Sequence(items.iter().map(serde_yaml::Value::from).collect())
            }
            Value::Map(map) => serde_yaml::Value::Mapping(
                map.iter()
                    .map(|(k, v)| {
                        (
                            serde_yaml::Value::String(k.clone()),
                            serde_yaml::Value::from(v),
                        )
                    })
                    .collect(),
            ),
        }
    }
}

/// Decodes a YAML document into a tree.
pub fn from_yaml_str(source: &str) -> Result<Value, BurrowError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(source)?;
    Ok(Value::from(yaml))
}

/// Encodes a tree as a YAML document.
pub fn to_yaml_string(value: &Value) -> Result<String, BurrowError> {
    Ok(serde_yaml::to_string(&serde_yaml::Value::from(value))?)
}
