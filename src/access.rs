//! Path-addressed operations over a container tree.
//!
//! Every operation here is best-effort: a missing key, an out-of-range index,
//! or a mid-walk type mismatch (a scalar where a map was needed) makes the
//! walk stop and report absence - `None`, `false`, or a silent no-op. Nothing
//! panics and nothing returns an error for an unresolvable path; callers that
//! need to tell a stored [`Value::Nil`] apart from absence use [`Value::get`]
//! (which returns `Option`) together with [`Value::contains`].

use im::HashMap;

use crate::path::{Path, Segment};
use crate::tree::Value;

// ============================================================================
// RESOLUTION: contains, get, get_mut
// ============================================================================

impl Value {
    /// Indicates whether an element exists at `path`.
    ///
    /// The walk up to the last segment must resolve inside maps. A bracketed
    /// final segment exists when the unbracketed key holds a list longer than
    /// the index; a plain final segment exists when the key is present. A key
    /// present with a stored `Nil` still exists - use [`Value::get`] when
    /// that distinction matters. The empty path never exists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use burrow::Path;
    /// let tree = burrow::codec::from_json_str(r#"{"x": {"y": 1}}"#).unwrap();
    /// assert!(tree.contains(&Path::parse("x.y")));
    /// assert!(!tree.contains(&Path::parse("x.z")));
    /// assert!(!tree.contains(&Path::parse("x.y[0]")));
    /// ```
    pub fn contains(&self, path: &Path) -> bool {
        let Some((last, init)) = path.segments().split_last() else {
            return false;
        };
        let Some(Value::Map(map)) = self.descend(init) else {
            return false;
        };
        match last.index {
            Some(inx) => {
                matches!(map.get(last.key.as_str()), Some(Value::List(items)) if inx < items.len())
            }
            None => map.contains_key(last.key.as_str()),
        }
    }

    /// Resolves the value at `path`.
    ///
    /// Returns `None` when any intermediate node is not a map, a key is
    /// absent, or a bracketed segment does not land inside a list of
    /// sufficient length. The empty path resolves to the tree itself.
    pub fn get(&self, path: &Path) -> Option<&Value> {
        self.descend(path.segments())
    }

    /// Mutable variant of [`Value::get`], with identical resolution rules.
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Value> {
        self.descend_mut(path.segments())
    }

    fn descend(&self, segments: &[Segment]) -> Option<&Value> {
        let mut node = self;
        for seg in segments {
            let Value::Map(map) = node else { return None };
            let child = map.get(seg.key.as_str())?;
            node = match seg.index {
                Some(inx) => {
                    let Value::List(items) = child else { return None };
                    items.get(inx)?
                }
                None => child,
            };
        }
        Some(node)
    }

    fn descend_mut(&mut self, segments: &[Segment]) -> Option<&mut Value> {
        let mut node = self;
        for seg in segments {
            let Value::Map(map) = node else { return None };
            let child = map.get_mut(seg.key.as_str())?;
            node = match seg.index {
                Some(inx) => {
                    let Value::List(items) = child else { return None };
                    items.get_mut(inx)?
                }
                None => child,
            };
        }
        Some(node)
    }
}

// ============================================================================
// MUTATION: set, pop
// ============================================================================

impl Value {
    /// Assigns `value` at `path`, creating missing intermediate maps.
    ///
    /// Only plain intermediate segments are auto-created (as empty maps);
    /// bracketed segments must already resolve, and an existing non-map
    /// intermediate is never overwritten - in either case the walk aborts
    /// without mutating anything. A bracketed final segment assigns in place
    /// only when the index is within the current list length; lists are never
    /// grown. The empty path is a no-op.
    pub fn set(&mut self, path: &Path, value: Value) {
        let Some((last, init)) = path.segments().split_last() else {
            return;
        };
        let mut node = self;
        for seg in init {
            let Value::Map(map) = node else { return };
            match seg.index {
                None => {
                    node = map
                        .entry(seg.key.clone())
                        .or_insert_with(Value::empty_map);
                }
                Some(inx) => {
                    let Some(Value::List(items)) = map.get_mut(seg.key.as_str()) else {
                        return;
                    };
                    let Some(elem) = items.get_mut(inx) else { return };
                    node = elem;
                }
            }
        }
        let Value::Map(map) = node else { return };
        match last.index {
            None => {
                map.insert(last.key.clone(), value);
            }
            Some(inx) => {
                if let Some(Value::List(items)) = map.get_mut(last.key.as_str()) {
                    if let Some(slot) = items.get_mut(inx) {
                        *slot = value;
                    }
                }
            }
        }
    }

    /// Removes and returns the element at `path`.
    ///
    /// The parent of the final segment is resolved with [`Value::get`]
    /// semantics and must be a map. A bracketed final segment removes the
    /// element at that index, shifting the remainder; a plain final segment
    /// removes the key. Returns `None` when nothing was removed.
    pub fn pop(&mut self, path: &Path) -> Option<Value> {
        let (last, init) = path.segments().split_last()?;
        let Value::Map(map) = self.descend_mut(init)? else {
            return None;
        };
        match last.index {
            Some(inx) => {
                let Some(Value::List(items)) = map.get_mut(last.key.as_str()) else {
                    return None;
                };
                if inx < items.len() {
                    Some(items.remove(inx))
                } else {
                    None
                }
            }
            None => map.remove(last.key.as_str()),
        }
    }
}

// ============================================================================
// WHOLE-TREE OPERATIONS: replace_value, merge_from
// ============================================================================

impl Value {
    /// Rewrites every entry equal to `old` with a copy of `new`, at any
    /// depth, in maps and lists alike. The input is assumed acyclic.
    pub fn replace_value(&mut self, old: &Value, new: &Value) {
        match self {
            Value::Map(map) => {
                for (_, v) in map.iter_mut() {
                    if v == old {
                        *v = new.clone();
                    } else {
                        v.replace_value(old, new);
                    }
                }
            }
            Value::List(items) => {
                for item in items.iter_mut() {
                    if item == old {
                        *item = new.clone();
                    } else {
                        item.replace_value(old, new);
                    }
                }
            }
            _ => {}
        }
    }

    /// Merges `source` into `self` in place.
    ///
    /// Keys absent from `self` are copied in. When a key collides: two maps
    /// merge recursively; two lists append the source elements not already
    /// present (by equality), preserving existing order; anything else is
    /// overwritten by the source value. The operation is idempotent. When
    /// either side is not a map, nothing happens.
    pub fn merge_from(&mut self, source: &Value) {
        let Value::Map(src) = source else { return };
        let Value::Map(target) = self else { return };
        merge_maps(target, src);
    }
}

fn merge_maps(target: &mut HashMap<String, Value>, source: &HashMap<String, Value>) {
    for (key, svalue) in source.iter() {
        if !target.contains_key(key) {
            target.insert(key.clone(), svalue.clone());
            continue;
        }
        let Some(tvalue) = target.get_mut(key) else {
            continue;
        };
        match (tvalue, svalue) {
            (Value::Map(tmap), Value::Map(smap)) => merge_maps(tmap, smap),
            (Value::List(titems), Value::List(sitems)) => {
                for item in sitems {
                    if !titems.contains(item) {
                        titems.push(item.clone());
                    }
                }
            }
            (other, svalue) => *other = svalue.clone(),
        }
    }
}

// ============================================================================
// STRUCTURAL RESHAPING: coalesce, hoist, listify
// ============================================================================

impl Value {
    /// Collapses one nesting level at the last two keys of `chain`.
    ///
    /// The list at the penultimate key is rebuilt: for each map element, the
    /// sibling fields are copied into every map element of the list found at
    /// the final key, and those inner elements replace the outer record.
    /// Elements without such an inner list collapse to their sibling fields
    /// alone; non-map elements pass through unchanged. Sibling fields
    /// overwrite same-named inner fields. Intermediate keys holding lists
    /// distribute the operation across their map elements. Chains of two or
    /// fewer keys do nothing.
    ///
    /// Bracket indications in `chain` are ignored; the keys are used as
    /// plain map keys.
    pub fn coalesce(&mut self, chain: &Path) {
        self.coalesce_segments(chain.segments());
    }

    fn coalesce_segments(&mut self, segments: &[Segment]) {
        if segments.len() <= 2 {
            return;
        }
        let mut node = self;
        for (inx, seg) in segments[..segments.len() - 2].iter().enumerate() {
            let Value::Map(map) = node else { return };
            let Some(child) = map.get_mut(seg.key.as_str()) else {
                return;
            };
            if let Value::List(items) = child {
                for item in items.iter_mut() {
                    if item.is_map() {
                        item.coalesce_segments(&segments[inx + 1..]);
                    }
                }
                return;
            }
            node = child;
        }
        let Value::Map(map) = node else { return };
        let penultimate = segments[segments.len() - 2].key.as_str();
        let last_key = segments[segments.len() - 1].key.as_str();
        if !matches!(map.get(penultimate), Some(Value::List(_))) {
            return;
        }
        let Some(Value::List(elements)) = map.remove(penultimate) else {
            return;
        };
        let mut rebuilt: Vec<Value> = Vec::new();
        for element in elements {
            let Value::Map(emap) = element else {
                rebuilt.push(element);
                continue;
            };
            let mut siblings: HashMap<String, Value> = HashMap::new();
            let mut inner: Vec<Value> = Vec::new();
            for (k, v) in emap {
                if k == last_key {
                    if let Value::List(vs) = v {
                        inner.extend(vs);
                        continue;
                    }
                    siblings.insert(k, v);
                } else {
                    siblings.insert(k, v);
                }
            }
            if inner.is_empty() {
                rebuilt.push(Value::Map(siblings));
            } else {
                for mut item in inner {
                    if let Value::Map(imap) = &mut item {
                        for (k, v) in siblings.iter() {
                            imap.insert(k.clone(), v.clone());
                        }
                    }
                    rebuilt.push(item);
                }
            }
        }
        map.insert(penultimate.to_string(), Value::List(rebuilt));
    }

    /// Lifts the entries of the map at `chain` one level up.
    ///
    /// The map at the final key is removed and its entries are inserted into
    /// the parent, overwriting same-named keys. Intermediate keys holding
    /// lists distribute the operation across their map elements. Non-map
    /// targets are left untouched.
    pub fn hoist(&mut self, chain: &Path) {
        self.hoist_segments(chain.segments());
    }

    fn hoist_segments(&mut self, segments: &[Segment]) {
        let Some((last, init)) = segments.split_last() else {
            return;
        };
        let mut node = self;
        for (inx, seg) in init.iter().enumerate() {
            let Value::Map(map) = node else { return };
            let Some(child) = map.get_mut(seg.key.as_str()) else {
                return;
            };
            if let Value::List(items) = child {
                for item in items.iter_mut() {
                    if item.is_map() {
                        item.hoist_segments(&segments[inx + 1..]);
                    }
                }
                return;
            }
            node = child;
        }
        let Value::Map(map) = node else { return };
        if !matches!(map.get(last.key.as_str()), Some(Value::Map(_))) {
            return;
        }
        if let Some(Value::Map(lifted)) = map.remove(last.key.as_str()) {
            for (k, v) in lifted {
                map.insert(k, v);
            }
        }
    }

    /// Wraps the non-list value at `chain` in a single-element list.
    ///
    /// Lists encountered up to the penultimate key are processed
    /// recursively, including lists directly nested in lists. A value that
    /// is already a list, or an absent value, is left untouched.
    pub fn listify(&mut self, chain: &Path) {
        self.listify_segments(chain.segments());
    }

    fn listify_segments(&mut self, segments: &[Segment]) {
        let Some((last, init)) = segments.split_last() else {
            return;
        };
        let mut node = self;
        for (inx, seg) in init.iter().enumerate() {
            let Value::Map(map) = node else { return };
            let Some(child) = map.get_mut(seg.key.as_str()) else {
                return;
            };
            if let Value::List(items) = child {
                listify_items(items, &segments[inx + 1..]);
                return;
            }
            node = child;
        }
        let Value::Map(map) = node else { return };
        let existing = map.get(last.key.as_str());
        if matches!(existing, Some(v) if !v.is_list()) {
            if let Some(item) = map.remove(last.key.as_str()) {
                map.insert(last.key.clone(), Value::List(vec![item]));
            }
        }
    }
}

fn listify_items(items: &mut [Value], segments: &[Segment]) {
    for item in items.iter_mut() {
        if let Value::List(nested) = item {
            listify_items(nested, segments);
        } else if item.is_map() {
            item.listify_segments(segments);
        }
    }
}

// ============================================================================
// FIRST-LEVEL LOOKUPS
// ============================================================================

impl Value {
    /// Returns a key of this map holding `value`, if any. Only first-level
    /// entries are inspected; which key is returned is unspecified when
    /// several match.
    pub fn first_key_for(&self, value: &Value) -> Option<&str> {
        let Value::Map(map) = self else { return None };
        map.iter()
            .find(|(_, v)| *v == value)
            .map(|(k, _)| k.as_str())
    }

    /// Returns every first-level key of this map holding `value`.
    pub fn keys_for(&self, value: &Value) -> Vec<&str> {
        let Value::Map(map) = self else { return Vec::new() };
        map.iter()
            .filter(|(_, v)| *v == value)
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

/// Locates the first map in `items` whose value at `chain` equals `value`.
pub fn find_in_list<'a>(items: &'a [Value], chain: &Path, value: &Value) -> Option<&'a Value> {
    items
        .iter()
        .filter(|item| item.is_map())
        .find(|item| item.get(chain) == Some(value))
}
