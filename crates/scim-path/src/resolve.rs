//! Path resolution against a record tree.
//!
//! Two modes:
//!
//! - [`resolve_ref`] walks for writing. Missing (or non-object) intermediate
//!   steps are replaced with empty objects, so it never fails.
//! - [`resolve_value`] walks read-only and returns `None` for anything
//!   missing along the way.

use serde_json::{Map, Value};

use crate::types::{PathRef, PathStep};

/// Resolve `path` for writing.
///
/// Walks every step but the last, inserting an empty object wherever the
/// step is absent or holds a non-object value, and returns the object at the
/// second-to-last level together with the last step. This mutates `root`
/// even if the returned reference is never written through.
///
/// An empty `path` resolves to `root` itself with an empty attribute name.
///
/// # Example
///
/// ```
/// use scim_path::resolve_ref;
/// use serde_json::{json, Map};
///
/// let mut record = Map::new();
/// let mut slot = resolve_ref(&mut record, &["name".into(), "givenname".into()]);
/// slot.set(json!("Bob"));
/// assert_eq!(serde_json::Value::Object(record), json!({"name": {"givenname": "Bob"}}));
/// ```
pub fn resolve_ref<'a>(root: &'a mut Map<String, Value>, path: &[PathStep]) -> PathRef<'a> {
    let Some((last, parents)) = path.split_last() else {
        return PathRef { target: root, attribute: PathStep::new() };
    };
    let mut current = root;
    for step in parents {
        let slot = current
            .entry(step.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        current = vivify(slot);
    }
    PathRef { target: current, attribute: last.clone() }
}

/// Resolve `path` read-only. `None` is the absent marker.
///
/// # Example
///
/// ```
/// use scim_path::resolve_value;
/// use serde_json::json;
///
/// let record = json!({"name": {"givenname": "Bob"}});
/// let record = record.as_object().unwrap();
/// assert_eq!(resolve_value(record, &["name".into(), "givenname".into()]), Some(&json!("Bob")));
/// assert_eq!(resolve_value(record, &["emails".into(), "value".into()]), None);
/// ```
pub fn resolve_value<'a>(root: &'a Map<String, Value>, path: &[PathStep]) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;
    let mut current = root;
    for step in parents {
        current = current.get(step)?.as_object()?;
    }
    current.get(last)
}

/// Turns `slot` into an object if it is not one already and borrows the map.
fn vivify(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot holds an object after vivify"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn steps(s: &str) -> Vec<String> {
        s.split('.').map(str::to_string).collect()
    }

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_ref_single_step() {
        let mut record = obj(json!({"username": "bob"}));
        let slot = resolve_ref(&mut record, &steps("username"));
        assert_eq!(slot.attribute, "username");
        assert_eq!(slot.get(), Some(&json!("bob")));
    }

    #[test]
    fn test_ref_auto_vivifies() {
        let mut record = Map::new();
        let slot = resolve_ref(&mut record, &steps("a.b.c"));
        assert_eq!(slot.attribute, "c");
        assert_eq!(slot.get(), None);
        assert_eq!(Value::Object(record), json!({"a": {"b": {}}}));
    }

    #[test]
    fn test_ref_replaces_scalar_intermediate() {
        let mut record = obj(json!({"name": "Bob"}));
        resolve_ref(&mut record, &steps("name.givenname")).set(json!("Bob"));
        assert_eq!(Value::Object(record), json!({"name": {"givenname": "Bob"}}));
    }

    #[test]
    fn test_ref_keeps_existing_siblings() {
        let mut record = obj(json!({"name": {"familyname": "Smith"}}));
        resolve_ref(&mut record, &steps("name.givenname")).set(json!("Bob"));
        assert_eq!(
            Value::Object(record),
            json!({"name": {"familyname": "Smith", "givenname": "Bob"}})
        );
    }

    #[test]
    fn test_ref_empty_path_is_root() {
        let mut record = obj(json!({"a": 1}));
        let slot = resolve_ref(&mut record, &[]);
        assert_eq!(slot.attribute, "");
        assert_eq!(slot.target.len(), 1);
    }

    #[test]
    fn test_value_missing_intermediate() {
        let record = obj(json!({"name": {"givenname": "Bob"}}));
        assert_eq!(resolve_value(&record, &steps("meta.created")), None);
        assert_eq!(resolve_value(&record, &steps("name.familyname")), None);
        assert_eq!(resolve_value(&record, &steps("name.givenname.x")), None);
    }

    #[test]
    fn test_value_has_no_side_effects() {
        let record = obj(json!({"a": {}}));
        let before = record.clone();
        assert_eq!(resolve_value(&record, &steps("a.b.c")), None);
        assert_eq!(record, before);
    }

    #[test]
    fn test_value_empty_path() {
        let record = obj(json!({"a": 1}));
        assert_eq!(resolve_value(&record, &[]), None);
    }
}
