//! Type definitions for attribute paths.

use serde_json::{Map, Value};

/// One lowercase step of an attribute path (an object key).
pub type PathStep = String;

/// A parsed attribute path.
pub type Path = Vec<PathStep>;

/// The root object of a user record.
pub type Record = Map<String, Value>;

/// A mutable reference to an attribute slot inside a record.
///
/// `target` is the object one level above the attribute, `attribute` is the
/// lowercase key inside it. The slot itself may or may not exist yet.
/// A `PathRef` borrows the record, so it cannot outlive the operation that
/// produced it.
#[derive(Debug)]
pub struct PathRef<'a> {
    pub target: &'a mut Map<String, Value>,
    pub attribute: PathStep,
}

impl<'a> PathRef<'a> {
    /// Current value at the referenced slot, if any.
    pub fn get(&self) -> Option<&Value> {
        self.target.get(&self.attribute)
    }

    /// Mutable access to the current value at the slot, if any.
    pub fn get_mut(&mut self) -> Option<&mut Value> {
        self.target.get_mut(&self.attribute)
    }

    /// Overwrites the slot, returning the previous value.
    pub fn set(&mut self, value: Value) -> Option<Value> {
        self.target.insert(self.attribute.clone(), value)
    }

    /// Removes the slot, returning the previous value. Absent slots are a no-op.
    /// Sibling keys keep their order.
    pub fn remove(&mut self) -> Option<Value> {
        self.target.shift_remove(&self.attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_ref_set_get_remove() {
        let mut map = Map::new();
        let mut slot = PathRef { target: &mut map, attribute: "nickname".to_string() };
        assert_eq!(slot.get(), None);
        assert_eq!(slot.set(json!("Al")), None);
        assert_eq!(slot.get(), Some(&json!("Al")));
        assert_eq!(slot.remove(), Some(json!("Al")));
        assert_eq!(slot.remove(), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_remove_keeps_sibling_order() {
        let mut map = json!({"a": 1, "b": 2, "c": 3}).as_object().cloned().unwrap();
        PathRef { target: &mut map, attribute: "a".to_string() }.remove();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "c"]);
    }
}
