//! Periodic snapshotting.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::store::{StoreError, UserStore};

/// Encodes the directory under the read lock, then writes it with the lock
/// released. Writes are serialized, and one encoded earlier than the last
/// write is dropped.
pub async fn snapshot_once(store: &RwLock<UserStore>) -> Result<(), StoreError> {
    let (writer, ticket, path, bytes) = {
        let guard = store.read().await;
        let Some(path) = guard.snapshot_path().map(|p| p.to_path_buf()) else {
            return Ok(());
        };
        let writer = guard.snapshot_writer();
        let ticket = writer.ticket();
        (writer, ticket, path, guard.encode_snapshot()?)
    };
    let written = tokio::task::spawn_blocking(move || writer.write(ticket, &path, &bytes))
        .await
        .map_err(|e| StoreError::Io(io::Error::other(e)))??;
    if !written {
        tracing::debug!(ticket, "skipped stale snapshot");
    }
    Ok(())
}

/// Snapshots every `period` until the task is aborted. Failures are logged
/// and retried on the next tick.
pub fn spawn_snapshot_loop(store: Arc<RwLock<UserStore>>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match snapshot_once(&store).await {
                Ok(()) => tracing::debug!("periodic snapshot written"),
                Err(err) => tracing::error!("periodic snapshot failed: {err}"),
            }
        }
    })
}
