//! Key canonicalization.
//!
//! SCIM attribute names are case-insensitive, but clients disagree on casing
//! (`userName`, `username`, `UserName`). Records are stored with every
//! structural key lowercased so lookups can compare plain strings. String
//! *values* are never touched.

use serde_json::{Map, Value};

/// Returns a copy of `value` with every object key lowercased, at every depth.
///
/// Arrays are mapped element-wise; scalars are returned unchanged. If two keys
/// of one object collapse to the same lowercase key, the later one wins and
/// keeps the position of the first.
///
/// # Example
///
/// ```
/// use scim_path::canonicalize;
/// use serde_json::json;
///
/// let doc = json!({"userName": "Bob", "Name": {"givenName": "Bob"}});
/// assert_eq!(
///     canonicalize(&doc),
///     json!({"username": "Bob", "name": {"givenname": "Bob"}})
/// );
/// ```
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(canonicalize_map(map)),
        Value::Array(arr) => Value::Array(arr.iter().map(canonicalize).collect()),
        scalar => scalar.clone(),
    }
}

/// Canonicalizes an object's keys recursively.
pub fn canonicalize_map(map: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(map.len());
    for (key, val) in map {
        out.insert(key.to_lowercase(), canonicalize(val));
    }
    out
}

/// In-place variant of [`canonicalize`], used when the caller owns the tree.
pub fn canonicalize_in_place(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.keys().any(|k| has_uppercase(k)) {
                let owned = std::mem::take(map);
                for (key, mut val) in owned {
                    canonicalize_in_place(&mut val);
                    map.insert(key.to_lowercase(), val);
                }
            } else {
                map.values_mut().for_each(canonicalize_in_place);
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(canonicalize_in_place),
        _ => {}
    }
}

fn has_uppercase(s: &str) -> bool {
    s.to_lowercase() != s
}
