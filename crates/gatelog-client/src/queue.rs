//! Durable offline queue for reason submissions.
//!
//! The queue is a single JSON document on disk:
//!
//! ```text
//! ~/.gatelog/pending.json
//! {
//!   "reasons": [
//!     { "log_id": "550e8400-...", "reason": "Study", "queued_at": "..." }
//!   ]
//! }
//! ```
//!
//! Writes are atomic (write to temp, then rename), so a crash leaves
//! either the old document or the new one, never a torn file.

use crate::error::QueueError;
use chrono::{DateTime, Utc};
use gatelog_store::EventStore;
use gatelog_types::LogId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// One queued reason write, waiting for connectivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingMutation {
    /// Record the reason belongs to.
    pub log_id: LogId,
    /// Reason text as the visitor entered it.
    pub reason: String,
    /// When the device queued it (device clock).
    pub queued_at: DateTime<Utc>,
}

/// On-disk document shape.
#[derive(Debug, Default, Serialize, Deserialize)]
struct QueueDocument {
    reasons: Vec<PendingMutation>,
}

/// What a flush accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    /// Items replayed into the store and removed from the queue.
    pub applied: usize,
    /// Items still queued after the flush.
    pub remaining: usize,
}

/// Durable queue of pending reason writes.
///
/// All operations are read-modify-write over the whole document,
/// serialized by an internal async mutex shared across clones: a
/// submission may race a reconnect-triggered flush on the same device,
/// and both touch the document and the same temp file. The lock covers
/// document access only, never the store replay, so enqueue does not
/// wait out a slow flush. The queue is device-local; there is no
/// cross-process locking.
#[derive(Debug, Clone)]
pub struct PendingQueue {
    path: PathBuf,
    doc_lock: Arc<Mutex<()>>,
}

impl PendingQueue {
    /// Creates a queue backed by the given document path.
    ///
    /// The parent directory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Io` if the directory cannot be created.
    pub fn new(path: PathBuf) -> Result<Self, QueueError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            doc_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Returns the document path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temp-file sibling for atomic writes.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("pending.json");
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    async fn load(&self) -> Result<QueueDocument, QueueError> {
        if !self.path.exists() {
            return Ok(QueueDocument::default());
        }
        let json = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn save(&self, doc: &QueueDocument) -> Result<(), QueueError> {
        let json = serde_json::to_string_pretty(doc)?;
        let temp = self.temp_path();
        fs::write(&temp, &json).await?;
        fs::rename(&temp, &self.path).await?;
        Ok(())
    }

    /// Appends a pending reason write.
    ///
    /// # Errors
    ///
    /// Local I/O or a corrupt document only; the store is not involved.
    pub async fn enqueue(
        &self,
        log_id: LogId,
        reason: impl Into<String>,
        queued_at: DateTime<Utc>,
    ) -> Result<(), QueueError> {
        let _guard = self.doc_lock.lock().await;
        let mut doc = self.load().await?;
        doc.reasons.push(PendingMutation {
            log_id,
            reason: reason.into(),
            queued_at,
        });
        self.save(&doc).await?;
        debug!(%log_id, pending = doc.reasons.len(), "reason queued offline");
        Ok(())
    }

    /// Current queue contents, in enqueue order.
    pub async fn pending(&self) -> Result<Vec<PendingMutation>, QueueError> {
        let _guard = self.doc_lock.lock().await;
        Ok(self.load().await?.reasons)
    }

    /// Number of queued items (for the "N pending" indicator).
    pub async fn pending_len(&self) -> Result<usize, QueueError> {
        let _guard = self.doc_lock.lock().await;
        Ok(self.load().await?.reasons.len())
    }

    /// Replays queued writes into the store, in enqueue order.
    ///
    /// Snapshot-then-remove-on-success: the flush removes exactly the
    /// items it applied, so items enqueued while the flush runs stay
    /// queued, and a crash mid-flush re-replays instead of losing
    /// writes. Replay is last-write-wins per record.
    ///
    /// # Errors
    ///
    /// The first store failure stops the flush: already-applied items
    /// are removed from the document, the failing item and everything
    /// after it stay queued, and the store error is returned.
    pub async fn flush(&self, store: &dyn EventStore) -> Result<FlushReport, QueueError> {
        let snapshot = {
            let _guard = self.doc_lock.lock().await;
            self.load().await?.reasons
        };
        if snapshot.is_empty() {
            return Ok(FlushReport {
                applied: 0,
                remaining: 0,
            });
        }

        // Replay runs unlocked: a concurrent enqueue must not wait out
        // a slow store.
        let mut applied = Vec::new();
        let mut failure = None;
        for item in &snapshot {
            match store.set_reason(item.log_id, &item.reason).await {
                Ok(()) => applied.push(item.clone()),
                Err(e) => {
                    warn!(log_id = %item.log_id, error = %e, "flush stopped");
                    failure = Some(e);
                    break;
                }
            }
        }

        // Re-read rather than rewrite the snapshot: anything enqueued
        // since must survive.
        let _guard = self.doc_lock.lock().await;
        let mut doc = self.load().await?;
        remove_applied(&mut doc, &applied);
        self.save(&doc).await?;

        match failure {
            Some(e) => Err(e.into()),
            None => {
                info!(applied = applied.len(), "offline queue flushed");
                Ok(FlushReport {
                    applied: applied.len(),
                    remaining: doc.reasons.len(),
                })
            }
        }
    }
}

/// Removes each applied item from the document, one occurrence per
/// applied entry, matched by full identity.
fn remove_applied(doc: &mut QueueDocument, applied: &[PendingMutation]) {
    for done in applied {
        if let Some(pos) = doc.reasons.iter().position(|item| item == done) {
            doc.reasons.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gatelog_store::{
        ActorProfile, LogChange, LogRecord, MemoryStore, OccupancyAggregate, StoreError,
    };
    use gatelog_types::{ActorId, ErrorCode};
    use std::collections::HashSet;
    use tempfile::TempDir;
    use tokio::sync::{broadcast, Notify};

    fn ts(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    fn queue_in(dir: &TempDir) -> PendingQueue {
        PendingQueue::new(dir.path().join("pending.json")).unwrap()
    }

    #[tokio::test]
    async fn missing_document_is_empty_queue() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir);
        assert_eq!(queue.pending_len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn enqueue_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let log_id = LogId::new();
        {
            let queue = queue_in(&dir);
            queue.enqueue(log_id, "Study", ts(1_000)).await.unwrap();
        }

        // New instance over the same path, as after a restart.
        let queue = queue_in(&dir);
        let pending = queue.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].log_id, log_id);
        assert_eq!(pending[0].reason, "Study");
    }

    #[tokio::test]
    async fn flush_applies_in_order_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir);
        let store = Arc::new(MemoryStore::new());
        let log_id = store
            .create_log(ActorId::new("s-1"), ts(1_000))
            .await
            .unwrap();

        queue.enqueue(log_id, "first", ts(2_000)).await.unwrap();
        queue.enqueue(log_id, "second", ts(3_000)).await.unwrap();

        let report = queue.flush(store.as_ref()).await.unwrap();
        assert_eq!(report.applied, 2);
        assert_eq!(report.remaining, 0);
        assert_eq!(queue.pending_len().await.unwrap(), 0);

        let record = store.get_log(log_id).await.unwrap();
        assert_eq!(record.reason.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn unavailable_store_keeps_everything_queued() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir);
        let store = Arc::new(MemoryStore::new());
        let log_id = store
            .create_log(ActorId::new("s-1"), ts(1_000))
            .await
            .unwrap();
        queue.enqueue(log_id, "Study", ts(2_000)).await.unwrap();

        store.set_available(false);
        let err = queue.flush(store.as_ref()).await.unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(queue.pending_len().await.unwrap(), 1);

        // Connectivity back: the same flush call drains the queue.
        store.set_available(true);
        let report = queue.flush(store.as_ref()).await.unwrap();
        assert_eq!(report.applied, 1);
        assert_eq!(queue.pending_len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn flush_stops_at_first_failure_keeping_the_rest() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir);
        let store = Arc::new(MemoryStore::new());
        let good = store
            .create_log(ActorId::new("s-1"), ts(1_000))
            .await
            .unwrap();
        let after = store
            .create_log(ActorId::new("s-2"), ts(1_100))
            .await
            .unwrap();

        queue.enqueue(good, "applied", ts(2_000)).await.unwrap();
        queue.enqueue(LogId::new(), "orphan", ts(2_100)).await.unwrap();
        queue.enqueue(after, "stranded", ts(2_200)).await.unwrap();

        let err = queue.flush(store.as_ref()).await.unwrap_err();
        assert!(matches!(err, QueueError::Store(_)));

        // The applied prefix is gone; the failure and its successors stay.
        let pending = queue.pending().await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].reason, "orphan");
        assert_eq!(pending[1].reason, "stranded");
        assert_eq!(
            store.get_log(good).await.unwrap().reason.as_deref(),
            Some("applied")
        );
        assert_eq!(store.get_log(after).await.unwrap().reason, None);
    }

    #[tokio::test]
    async fn empty_flush_reports_zero() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir);
        let store = MemoryStore::new();
        let report = queue.flush(&store).await.unwrap();
        assert_eq!(
            report,
            FlushReport {
                applied: 0,
                remaining: 0
            }
        );
    }

    #[tokio::test]
    async fn corrupt_document_is_a_codec_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pending.json");
        std::fs::write(&path, "{ not json").unwrap();

        let queue = PendingQueue::new(path).unwrap();
        let err = queue.pending().await.unwrap_err();
        assert_eq!(err.code(), "QUEUE_CODEC");
    }

    #[test]
    fn remove_applied_spares_items_enqueued_mid_flush() {
        let snapshot = vec![
            PendingMutation {
                log_id: LogId::new(),
                reason: "a".into(),
                queued_at: ts(1_000),
            },
            PendingMutation {
                log_id: LogId::new(),
                reason: "b".into(),
                queued_at: ts(1_100),
            },
        ];
        let late = PendingMutation {
            log_id: LogId::new(),
            reason: "late".into(),
            queued_at: ts(1_200),
        };

        // The document grew while the snapshot was being replayed.
        let mut doc = QueueDocument {
            reasons: vec![snapshot[0].clone(), snapshot[1].clone(), late.clone()],
        };
        remove_applied(&mut doc, &snapshot);
        assert_eq!(doc.reasons, vec![late]);
    }

    /// Store double whose `set_reason` parks until released, holding a
    /// flush mid-replay.
    struct GatedStore {
        inner: MemoryStore,
        entered: Notify,
        release: Notify,
    }

    impl GatedStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                entered: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl EventStore for GatedStore {
        async fn create_log(
            &self,
            actor_id: ActorId,
            entered_at: DateTime<Utc>,
        ) -> Result<LogId, StoreError> {
            self.inner.create_log(actor_id, entered_at).await
        }

        async fn mark_exited(
            &self,
            log_id: LogId,
            exited_at: DateTime<Utc>,
        ) -> Result<(), StoreError> {
            self.inner.mark_exited(log_id, exited_at).await
        }

        async fn set_reason(&self, log_id: LogId, reason: &str) -> Result<(), StoreError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.set_reason(log_id, reason).await
        }

        async fn get_log(&self, log_id: LogId) -> Result<LogRecord, StoreError> {
            self.inner.get_log(log_id).await
        }

        async fn list_logs(&self) -> Result<Vec<LogRecord>, StoreError> {
            self.inner.list_logs().await
        }

        async fn get_actor(&self, actor_id: &ActorId) -> Result<Option<ActorProfile>, StoreError> {
            self.inner.get_actor(actor_id).await
        }

        async fn upsert_actor(&self, profile: ActorProfile) -> Result<(), StoreError> {
            self.inner.upsert_actor(profile).await
        }

        async fn read_aggregate(&self) -> Result<Option<OccupancyAggregate>, StoreError> {
            self.inner.read_aggregate().await
        }

        async fn write_aggregate(&self, aggregate: OccupancyAggregate) -> Result<(), StoreError> {
            self.inner.write_aggregate(aggregate).await
        }

        fn subscribe(&self) -> broadcast::Receiver<LogChange> {
            self.inner.subscribe()
        }
    }

    #[tokio::test]
    async fn enqueue_during_inflight_flush_survives() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir);
        let store = Arc::new(GatedStore::new());
        let log_id = store
            .inner
            .create_log(ActorId::new("s-1"), ts(1_000))
            .await
            .unwrap();
        queue.enqueue(log_id, "first", ts(2_000)).await.unwrap();

        let flush_queue = queue.clone();
        let flush_store = store.clone();
        let flush =
            tokio::spawn(async move { flush_queue.flush(flush_store.as_ref()).await });

        // Flush has its snapshot and is parked inside the store write.
        store.entered.notified().await;
        let late = LogId::new();
        queue.enqueue(late, "late", ts(3_000)).await.unwrap();

        store.release.notify_one();
        let report = flush.await.unwrap().unwrap();
        assert_eq!(report.applied, 1);
        assert_eq!(report.remaining, 1);

        // Only the snapshot item was removed.
        let pending = queue.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].log_id, late);
        assert_eq!(
            store.inner.get_log(log_id).await.unwrap().reason.as_deref(),
            Some("first")
        );
    }

    #[tokio::test]
    async fn concurrent_enqueue_and_flush_loses_nothing() {
        let dir = TempDir::new().unwrap();
        let queue = queue_in(&dir);
        let store = Arc::new(MemoryStore::new());

        // Orphan ids never resolve in the store, so flush keeps them
        // queued; every enqueue racing a flush must succeed and its
        // item must still be present at the end.
        let mut expected = Vec::new();
        for i in 0..50i64 {
            let orphan = LogId::new();
            expected.push(orphan);

            let flush_queue = queue.clone();
            let flush_store = store.clone();
            let flusher =
                tokio::spawn(async move { flush_queue.flush(flush_store.as_ref()).await });

            queue
                .enqueue(orphan, format!("r-{i}"), ts(i))
                .await
                .unwrap();
            let _ = flusher.await.unwrap();
        }

        let pending = queue.pending().await.unwrap();
        assert_eq!(pending.len(), expected.len());
        let ids: HashSet<LogId> = pending.iter().map(|item| item.log_id).collect();
        for id in expected {
            assert!(ids.contains(&id));
        }
    }
}
