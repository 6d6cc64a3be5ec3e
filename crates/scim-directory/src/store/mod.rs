//! In-memory user directory with snapshot persistence.
//!
//! [`UserStore`] owns every record, keyed by `id` in insertion order. It is
//! not internally synchronized; the server wraps it in one lock so that a
//! request's whole resolve-and-mutate sequence is atomic.

pub mod snapshot;

pub use snapshot::SnapshotWriter;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use scim_path::{canonicalize_map, AtomicPaths, Record};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::filter::RecordFilter;
use crate::patch::{apply_patch, PatchOperation, PatchReport};
use crate::record::build_user;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user {0:?} not found")]
    NotFound(String),
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Records matched by a list query.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult<'a> {
    pub total_results: usize,
    pub resources: Vec<&'a Record>,
}

#[derive(Debug, Default)]
pub struct UserStore {
    users: IndexMap<String, Record>,
    atomic: AtomicPaths,
    snapshot_path: Option<PathBuf>,
    writer: Arc<SnapshotWriter>,
}

impl UserStore {
    /// An empty, memory-only directory.
    pub fn new(atomic: AtomicPaths) -> Self {
        Self { users: IndexMap::new(), atomic, snapshot_path: None, writer: Arc::default() }
    }

    /// Restores the directory from `path` (empty if the file does not exist)
    /// and snapshots back to it.
    pub fn open(path: impl Into<PathBuf>, atomic: AtomicPaths) -> Result<Self, StoreError> {
        let path = path.into();
        let users = snapshot::read(&path)?;
        tracing::info!(path = %path.display(), users = users.len(), "restored directory");
        Ok(Self { users, atomic, snapshot_path: Some(path), writer: Arc::default() })
    }

    pub fn atomic_paths(&self) -> &AtomicPaths {
        &self.atomic
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    pub fn snapshot_writer(&self) -> Arc<SnapshotWriter> {
        self.writer.clone()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Stores a new user under a freshly generated id.
    pub fn create(&mut self, input: &Record) -> Record {
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !self.users.contains_key(&candidate) {
                break candidate;
            }
        };
        let record = build_user(input, &id, Utc::now());
        self.users.insert(id, record.clone());
        record
    }

    /// Fully replaces the user `id`. Any `id` in `input` is ignored and
    /// fields missing from `input` are dropped.
    pub fn replace(&mut self, id: &str, input: &Record) -> Result<Record, StoreError> {
        let slot = self
            .users
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        *slot = build_user(input, id, Utc::now());
        Ok(slot.clone())
    }

    /// Applies a PATCH batch to the user `id`.
    ///
    /// The record's `id` survives whatever the batch does, and keys written by
    /// the batch are canonicalized.
    pub fn patch(
        &mut self,
        id: &str,
        ops: &[PatchOperation],
    ) -> Result<(Record, PatchReport), StoreError> {
        let record = self
            .users
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let report = apply_patch(record, ops, &self.atomic, Utc::now());
        record.insert("id".to_string(), Value::String(id.to_string()));
        *record = canonicalize_map(record);
        Ok((record.clone(), report))
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.users.get(id)
    }

    /// All records matching `filter`, in insertion order.
    pub fn list(&self, filter: &RecordFilter) -> ListResult<'_> {
        let resources: Vec<&Record> = self.users.values().filter(|r| filter.matches(r)).collect();
        ListResult { total_results: resources.len(), resources }
    }

    pub fn remove(&mut self, id: &str) -> Result<Record, StoreError> {
        self.users
            .shift_remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Serializes the directory in snapshot format.
    pub fn encode_snapshot(&self) -> Result<Vec<u8>, StoreError> {
        snapshot::encode(&self.users)
    }

    /// Writes a snapshot to the configured path. Memory-only stores do nothing.
    pub fn snapshot(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let ticket = self.writer.ticket();
        self.writer.write(ticket, path, &self.encode_snapshot()?)?;
        tracing::debug!(path = %path.display(), users = self.users.len(), "snapshot written");
        Ok(())
    }
}
