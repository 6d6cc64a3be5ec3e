//! Core types for the PATCH engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────

/// Reasons a single operation was skipped. None of these abort a batch.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error("unsupported patch op: {0:?}")]
    UnsupportedOperation(String),
    #[error("{op} without a path needs an object value")]
    MissingPath { op: String },
}

/// A PatchOp request body that could not be decoded. The whole request is
/// rejected.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("invalid PatchOp body: {0}")]
pub struct InvalidPatchBody(pub String);

// ── Op kind ───────────────────────────────────────────────────────────────

/// The recognised operation keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Replace,
    Delete,
}

impl OpKind {
    /// Case-insensitive keyword lookup. Unknown keywords yield `None`.
    pub fn parse(op: &str) -> Option<Self> {
        if op.eq_ignore_ascii_case("add") {
            Some(OpKind::Add)
        } else if op.eq_ignore_ascii_case("replace") {
            Some(OpKind::Replace)
        } else if op.eq_ignore_ascii_case("delete") {
            Some(OpKind::Delete)
        } else {
            None
        }
    }
}

// ── Operation ─────────────────────────────────────────────────────────────

/// One entry of a PatchOp `Operations` list, as sent by the client.
///
/// `op` is kept as the raw string so that unknown keywords survive decoding
/// and can be reported instead of failing the whole request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn new(op: impl Into<String>, path: impl Into<String>, value: Option<Value>) -> Self {
        Self { op: op.into(), path: Some(path.into()), value }
    }

    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self::new("add", path, Some(value))
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self::new("replace", path, Some(value))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new("delete", path, None)
    }

    pub fn kind(&self) -> Option<OpKind> {
        OpKind::parse(&self.op)
    }
}

// ── Report ────────────────────────────────────────────────────────────────

/// Outcome of a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchReport {
    /// Number of operations that took effect.
    pub applied: usize,
    /// Operations that were skipped, in batch order.
    pub skipped: Vec<PatchError>,
}
