//! Record construction helpers shared by the store and the PATCH engine.

use chrono::{DateTime, SecondsFormat, Utc};
use scim_path::{canonicalize_map, resolve_ref, Record};
use serde_json::{json, Value};

pub const USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
pub const RESOURCE_TYPE_USER: &str = "User";

/// Formats `now` the way it is stored in `meta`.
pub fn timestamp(now: DateTime<Utc>) -> Value {
    Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Writes `meta.lastmodified`, creating `meta` if needed.
pub fn stamp_modified(record: &mut Record, now: DateTime<Utc>) {
    resolve_ref(record, &["meta".to_string(), "lastmodified".to_string()]).set(timestamp(now));
}

/// Builds a stored user from client input.
///
/// The input is canonicalized, then `id`, `schemas` (input's or the core user
/// schema) and a fresh `meta` are laid over it.
pub fn build_user(input: &Record, id: &str, now: DateTime<Utc>) -> Record {
    let mut record = canonicalize_map(input);
    let schemas = match record.get("schemas") {
        Some(Value::Array(list)) if !list.is_empty() => Value::Array(list.clone()),
        _ => json!([USER_SCHEMA]),
    };
    let stamp = timestamp(now);
    record.insert("id".to_string(), Value::String(id.to_string()));
    record.insert("schemas".to_string(), schemas);
    record.insert(
        "meta".to_string(),
        json!({
            "resourcetype": RESOURCE_TYPE_USER,
            "created": stamp,
            "lastmodified": stamp,
        }),
    );
    record
}

/// The record's `id`, if it has a string one.
pub fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}
