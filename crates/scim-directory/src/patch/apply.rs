//! PATCH apply logic.

use chrono::{DateTime, Utc};
use scim_path::{parse_attr_path, resolve_ref, AtomicPaths, PathRef, PathStep, Record};
use serde_json::Value;

use super::types::{OpKind, PatchError, PatchOperation, PatchReport};
use crate::record::stamp_modified;

// ── Individual operation applicators ─────────────────────────────────────

fn apply_add(slot: &mut PathRef<'_>, value: Value) {
    let value = match slot.get_mut() {
        Some(Value::Array(items)) => {
            match value {
                Value::Array(more) => items.extend(more),
                one => items.push(one),
            }
            return;
        }
        Some(Value::Object(fields)) => match value {
            Value::Object(more) => {
                fields.extend(more);
                return;
            }
            other => other,
        },
        _ => value,
    };
    slot.set(value);
}

fn apply_at(record: &mut Record, kind: OpKind, path: &[PathStep], value: Option<Value>) {
    let mut slot = resolve_ref(record, path);
    match kind {
        OpKind::Add => apply_add(&mut slot, value.unwrap_or(Value::Null)),
        OpKind::Replace => {
            slot.set(value.unwrap_or(Value::Null));
        }
        OpKind::Delete => {
            slot.remove();
        }
    }
}

// ── Main apply functions ──────────────────────────────────────────────────

/// Apply a single operation to `record` in place.
///
/// An operation without a `path` spreads its object `value` over the record:
/// each key is treated as an attribute path and gets its own operation of the
/// same kind.
pub fn apply_op(
    record: &mut Record,
    op: &PatchOperation,
    atomic: &AtomicPaths,
) -> Result<(), PatchError> {
    let kind = op
        .kind()
        .ok_or_else(|| PatchError::UnsupportedOperation(op.op.clone()))?;
    match (&op.path, &op.value) {
        (Some(path), value) => {
            let path = parse_attr_path(path, atomic);
            apply_at(record, kind, &path, value.clone());
            Ok(())
        }
        (None, Some(Value::Object(fields))) => {
            for (key, value) in fields {
                let path = parse_attr_path(key, atomic);
                apply_at(record, kind, &path, Some(value.clone()));
            }
            Ok(())
        }
        (None, _) => Err(PatchError::MissingPath { op: op.op.clone() }),
    }
}

/// Apply a batch in order and stamp `meta.lastmodified`.
///
/// Each operation sees the effects of the ones before it. Skipped operations
/// are logged and reported; they never stop the batch.
pub fn apply_patch(
    record: &mut Record,
    ops: &[PatchOperation],
    atomic: &AtomicPaths,
    now: DateTime<Utc>,
) -> PatchReport {
    let mut report = PatchReport::default();
    for (index, op) in ops.iter().enumerate() {
        match apply_op(record, op, atomic) {
            Ok(()) => report.applied += 1,
            Err(err) => {
                tracing::warn!(index, op = %op.op, "skipping patch operation: {err}");
                report.skipped.push(err);
            }
        }
    }
    stamp_modified(record, now);
    report
}

// ── Tests ─────────────────────────────────────────────────────────────────
