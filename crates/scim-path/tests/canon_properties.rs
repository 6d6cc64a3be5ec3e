use proptest::prelude::*;
use scim_path::{
    canonicalize, parse_attr_path, resolve_ref, resolve_value, AtomicPaths, Record,
};
use serde_json::{json, Map, Value};

fn arb_key() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]{0,7}"
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z ]{0,10}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

/// Flips the case of every key, recursively. Values stay as they are.
fn swap_key_case(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                let swapped: String = k
                    .chars()
                    .map(|c| {
                        if c.is_ascii_lowercase() {
                            c.to_ascii_uppercase()
                        } else {
                            c.to_ascii_lowercase()
                        }
                    })
                    .collect();
                out.insert(swapped, swap_key_case(v));
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(swap_key_case).collect()),
        other => other.clone(),
    }
}

proptest! {
    #[test]
    fn canonicalize_is_idempotent(doc in arb_value()) {
        let once = canonicalize(&doc);
        prop_assert_eq!(canonicalize(&once), once);
    }

    #[test]
    fn canonicalize_erases_key_case(doc in arb_value()) {
        prop_assert_eq!(canonicalize(&swap_key_case(&doc)), canonicalize(&doc));
    }

    #[test]
    fn write_then_read_round_trips(
        keys in prop::collection::vec(arb_key(), 1..=4),
        value in arb_value(),
    ) {
        let atomic = AtomicPaths::empty();
        let path = parse_attr_path(&keys.join("."), &atomic);
        let mut record = Record::new();
        resolve_ref(&mut record, &path).set(value.clone());
        prop_assert_eq!(resolve_value(&record, &path), Some(&value));
    }
}

#[test]
fn mixed_case_path_reads_canonical_record() {
    let doc = canonicalize(&json!({"Name": {"GivenName": "Barbara"}}));
    let record = doc.as_object().unwrap();
    let path = parse_attr_path("name.givenName", &AtomicPaths::empty());
    assert_eq!(resolve_value(record, &path), Some(&json!("Barbara")));
}

#[test]
fn enterprise_extension_is_one_step() {
    let doc = canonicalize(&json!({
        "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User": {"employeeNumber": "42"}
    }));
    let mut record = doc.as_object().cloned().unwrap();
    let atomic = AtomicPaths::default();
    let path = parse_attr_path(
        "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User",
        &atomic,
    );
    assert_eq!(path.len(), 1);
    assert_eq!(
        resolve_value(&record, &path),
        Some(&json!({"employeenumber": "42"}))
    );
    resolve_ref(&mut record, &path).set(json!({"department": "R&D"}));
    assert_eq!(record.len(), 1);
}
