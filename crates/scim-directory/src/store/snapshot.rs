//! Snapshot document I/O.
//!
//! The whole directory is one JSON object mapping `id` to record. Writes go
//! to a sibling `.tmp` file that is renamed over the target, so readers never
//! see a half-written snapshot.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use indexmap::map::Entry;
use indexmap::IndexMap;
use scim_path::{canonicalize_in_place, Record};
use serde_json::Value;

use super::StoreError;

/// Serialize the directory to the snapshot format.
pub fn encode(users: &IndexMap<String, Record>) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec_pretty(users)?)
}

/// Write `bytes` to `path` atomically.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Serializes snapshot writes for one path.
///
/// Callers take a [`ticket`](Self::ticket) while the directory is locked for
/// encoding and write later. A write whose ticket is older than the last one
/// written is dropped, so a slow periodic write never lands over a newer one.
#[derive(Debug, Default)]
pub struct SnapshotWriter {
    issued: AtomicU64,
    written: Mutex<u64>,
}

impl SnapshotWriter {
    pub fn ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Writes `bytes` unless a newer ticket already did. Returns whether the
    /// file was written.
    pub fn write(&self, ticket: u64, path: &Path, bytes: &[u8]) -> Result<bool, StoreError> {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        if *written >= ticket {
            return Ok(false);
        }
        write_atomic(path, bytes)?;
        *written = ticket;
        Ok(true)
    }
}

/// Read and canonicalize a snapshot. A missing file is an empty directory.
///
/// Records are re-keyed by their own `id`; a record without one takes its map
/// key as `id`.
pub fn read(path: &Path) -> Result<IndexMap<String, Record>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(IndexMap::new()),
        Err(e) => return Err(e.into()),
    };
    decode(&bytes)
}

/// Parse snapshot bytes, tolerating keys written in any casing.
pub fn decode(bytes: &[u8]) -> Result<IndexMap<String, Record>, StoreError> {
    let doc: Value = serde_json::from_slice(bytes)?;
    let Value::Object(entries) = doc else {
        return Err(StoreError::InvalidSnapshot("top level must be an object".into()));
    };
    let mut users = IndexMap::with_capacity(entries.len());
    for (key, mut value) in entries {
        canonicalize_in_place(&mut value);
        let Value::Object(mut record) = value else {
            return Err(StoreError::InvalidSnapshot(format!("entry {key:?} is not an object")));
        };
        let id = match record.get("id").and_then(Value::as_str) {
            Some(id) => {
                if id != key {
                    tracing::warn!(key = %key, id, "snapshot entry re-keyed by its id");
                }
                id.to_string()
            }
            None => {
                record.insert("id".to_string(), Value::String(key.clone()));
                key
            }
        };
        match users.entry(id) {
            Entry::Occupied(slot) => {
                return Err(StoreError::InvalidSnapshot(format!(
                    "duplicate id {:?}",
                    slot.key()
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
    }
    Ok(users)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
