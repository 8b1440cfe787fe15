//! Key-chain-driven reshaping of one tree into another.
//!
//! [`remap`] walks a source tree and rebuilds every entry whose dotted chain
//! is coupled to a destination chain, recursing through maps and lists while
//! tracking the growing source prefix (list recursion appends an `[index]`
//! indication). [`project`] is the flat variant: a list of chains becomes the
//! first level of a new map. Both are conveniences built entirely on
//! [`Value::get`] and [`Value::set`].

use crate::path::Path;
use crate::seq;
use crate::tree::Value;

/// Builds a new map from `source` according to `pairs` (from-chain to
/// to-chain couples).
///
/// Each first-level entry of `source` is looked up among `pairs` under its
/// dotted chain, prefixed with `prefix_from` when given; entries without a
/// coupled destination are dropped. Map and list values are transformed
/// recursively. `prefix_to`, when given and matching, is stripped from the
/// destination chain before the value is set into the result.
pub fn remap(
    source: &Value,
    pairs: &[(String, String)],
    prefix_from: Option<&str>,
    prefix_to: Option<&str>,
) -> Value {
    let Value::Map(map) = source else {
        return Value::empty_map();
    };
    let mut result = Value::empty_map();
    for (key, value) in map.iter() {
        let from_chain = match prefix_from {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };
        let Some(to_chain) = seq::find_coupled(pairs, &from_chain) else {
            continue;
        };
        let to_value = match value {
            Value::Map(_) => remap(value, pairs, Some(&from_chain), Some(to_chain)),
            Value::List(items) => {
                Value::List(remap_items(items, pairs, Some(&from_chain), Some(to_chain)))
            }
            other => other.clone(),
        };
        let mut target_chain = to_chain;
        if let Some(prefix) = prefix_to {
            if let Some(stripped) = target_chain.strip_prefix(prefix) {
                target_chain = stripped.strip_prefix('.').unwrap_or(stripped);
            }
        }
        result.set(&Path::parse(target_chain), to_value);
    }
    result
}

fn remap_items(
    items: &[Value],
    pairs: &[(String, String)],
    prefix_from: Option<&str>,
    prefix_to: Option<&str>,
) -> Vec<Value> {
    items
        .iter()
        .enumerate()
        .map(|(inx, value)| {
            let from_chain = prefix_from.map(|prefix| format!("{}[{}]", prefix, inx));
            match value {
                Value::Map(_) => remap(value, pairs, from_chain.as_deref(), prefix_to),
                Value::List(nested) => {
                    Value::List(remap_items(nested, pairs, from_chain.as_deref(), prefix_to))
                }
                other => other.clone(),
            }
        })
        .collect()
}

/// Builds a flat map by projecting the chains in `pairs` out of `source`.
///
/// Each pair is a source chain and an optional rename; the result holds one
/// first-level entry per pair, valued by `source.get(chain)` or `Nil` when
/// the chain does not resolve.
pub fn project(source: &Value, pairs: &[(String, Option<String>)]) -> Value {
    let mut result = im::HashMap::new();
    for (from_chain, rename) in pairs {
        let name = rename.as_deref().unwrap_or(from_chain.as_str());
        let value = source
            .get(&Path::parse(from_chain))
            .cloned()
            .unwrap_or(Value::Nil);
        result.insert(name.to_string(), value);
    }
    Value::Map(result)
}
