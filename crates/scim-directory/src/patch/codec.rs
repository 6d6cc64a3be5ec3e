//! JSON codec for SCIM PatchOp request bodies.
//!
//! Bodies arrive already canonicalized, so the `Operations` member is read as
//! `operations`. A bare array of operations is accepted as well.

use serde::Deserialize;
use serde_json::Value;

use super::types::{InvalidPatchBody, PatchOperation};

/// Decode the operation list from a canonical request body.
pub fn from_json(body: &Value) -> Result<Vec<PatchOperation>, InvalidPatchBody> {
    let ops = match body {
        Value::Array(_) => body,
        Value::Object(map) => map
            .get("operations")
            .ok_or_else(|| InvalidPatchBody("missing Operations".into()))?,
        _ => return Err(InvalidPatchBody("expected a PatchOp object".into())),
    };
    let ops = ops
        .as_array()
        .ok_or_else(|| InvalidPatchBody("Operations must be an array".into()))?;
    ops.iter()
        .enumerate()
        .map(|(i, op)| {
            PatchOperation::deserialize(op)
                .map_err(|e| InvalidPatchBody(format!("operation {i}: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scim_path::canonicalize;
    use serde_json::json;

    #[test]
    fn decodes_canonical_envelope() {
        let body = canonicalize(&json!({
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
            "Operations": [
                {"op": "Replace", "path": "userName", "value": "Bobby"},
                {"op": "Add", "value": {"nickName": "Bo"}}
            ]
        }));
        let ops = from_json(&body).unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0], PatchOperation::replace("userName", json!("Bobby")));
        assert_eq!(ops[1].path, None);
        assert_eq!(ops[1].value, Some(json!({"nickname": "Bo"})));
    }

    #[test]
    fn decodes_bare_array() {
        let ops = from_json(&json!([{"op": "delete", "path": "title"}])).unwrap();
        assert_eq!(ops, vec![PatchOperation::delete("title")]);
    }

    #[test]
    fn rejects_missing_operations() {
        assert!(matches!(from_json(&json!({"schemas": []})), Err(InvalidPatchBody(_))));
        assert!(matches!(from_json(&json!("add")), Err(InvalidPatchBody(_))));
        assert!(matches!(from_json(&json!([{"path": "x"}])), Err(InvalidPatchBody(_))));
    }
}
