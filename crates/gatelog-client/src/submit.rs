//! Reason submission with offline degradation.

use crate::error::QueueError;
use crate::queue::{FlushReport, PendingQueue};
use chrono::Utc;
use gatelog_store::{EventStore, StoreError};
use gatelog_types::LogId;
use std::sync::Arc;
use tracing::{debug, info};

/// How a submission was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Written to the store directly.
    Applied,
    /// Store unreachable; queued for replay on reconnect.
    Queued,
}

/// Accepts reason submissions, online or not.
///
/// The visitor always perceives acceptance: a reachable store gets the
/// write immediately, an unreachable one gets it on the next reconnect.
/// Only a genuinely bad submission (unknown log id) or a local disk
/// failure is surfaced.
pub struct ReasonSubmitter {
    store: Arc<dyn EventStore>,
    queue: PendingQueue,
}

impl ReasonSubmitter {
    /// Creates a submitter over the given store and queue.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>, queue: PendingQueue) -> Self {
        Self { store, queue }
    }

    /// Submits a visit reason.
    ///
    /// # Errors
    ///
    /// Store errors other than unavailability propagate (the write was
    /// rejected, not deferred); queue I/O failures propagate.
    pub async fn submit(
        &self,
        log_id: LogId,
        reason: &str,
    ) -> Result<SubmitOutcome, QueueError> {
        match self.store.set_reason(log_id, reason).await {
            Ok(()) => {
                debug!(%log_id, "reason applied directly");
                Ok(SubmitOutcome::Applied)
            }
            Err(StoreError::Unavailable) => {
                self.queue.enqueue(log_id, reason, Utc::now()).await?;
                info!(%log_id, "store unreachable, reason queued");
                Ok(SubmitOutcome::Queued)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replays the queue after connectivity returns.
    ///
    /// # Errors
    ///
    /// See [`PendingQueue::flush`].
    pub async fn flush_on_reconnect(&self) -> Result<FlushReport, QueueError> {
        self.queue.flush(self.store.as_ref()).await
    }

    /// Number of writes still waiting for connectivity.
    pub async fn pending_len(&self) -> Result<usize, QueueError> {
        self.queue.pending_len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use gatelog_store::MemoryStore;
    use gatelog_types::ActorId;
    use tempfile::TempDir;

    fn ts(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    fn submitter(store: Arc<MemoryStore>, dir: &TempDir) -> ReasonSubmitter {
        let queue = PendingQueue::new(dir.path().join("pending.json")).unwrap();
        ReasonSubmitter::new(store, queue)
    }

    #[tokio::test]
    async fn online_submit_applies_directly() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let log_id = store
            .create_log(ActorId::new("s-1"), ts(1_000))
            .await
            .unwrap();
        let submitter = submitter(store.clone(), &dir);

        let outcome = submitter.submit(log_id, "Study").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Applied);
        assert_eq!(submitter.pending_len().await.unwrap(), 0);
        assert_eq!(
            store.get_log(log_id).await.unwrap().reason.as_deref(),
            Some("Study")
        );
    }

    #[tokio::test]
    async fn offline_submit_queues_then_reconnect_applies() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let log_id = store
            .create_log(ActorId::new("s-1"), ts(1_000))
            .await
            .unwrap();
        let submitter = submitter(store.clone(), &dir);

        store.set_available(false);
        let outcome = submitter.submit(log_id, "Study").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Queued);
        assert_eq!(submitter.pending_len().await.unwrap(), 1);

        store.set_available(true);
        assert_eq!(store.get_log(log_id).await.unwrap().reason, None);
        let report = submitter.flush_on_reconnect().await.unwrap();
        assert_eq!(report.applied, 1);
        assert_eq!(submitter.pending_len().await.unwrap(), 0);
        assert_eq!(
            store.get_log(log_id).await.unwrap().reason.as_deref(),
            Some("Study")
        );
    }

    #[tokio::test]
    async fn unknown_log_rejects_instead_of_queueing() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let submitter = submitter(store, &dir);

        let err = submitter.submit(LogId::new(), "Study").await.unwrap_err();
        assert!(matches!(err, QueueError::Store(StoreError::LogNotFound(_))));
        assert_eq!(submitter.pending_len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn flush_replay_overwrites_direct_resubmission() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let log_id = store
            .create_log(ActorId::new("s-1"), ts(1_000))
            .await
            .unwrap();
        let submitter = submitter(store.clone(), &dir);

        store.set_available(false);
        submitter.submit(log_id, "old").await.unwrap();
        store.set_available(true);
        submitter.submit(log_id, "new").await.unwrap();

        // Replay overwrites: last write wins, and here the queued value
        // is the later replay.
        submitter.flush_on_reconnect().await.unwrap();
        assert_eq!(
            store.get_log(log_id).await.unwrap().reason.as_deref(),
            Some("old")
        );
    }
}
