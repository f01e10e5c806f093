//! The ingestion trigger: change feed → side effects.
//!
//! One task drains the subscription; side effects run on worker tasks
//! admitted through a semaphore, so a write burst costs at most
//! `worker_limit` concurrent tasks instead of one unbounded spawn per
//! event.
//!
//! # Per-change decision
//!
//! | Change | Notification | Recompute |
//! |--------|--------------|-----------|
//! | created, Entered | yes (once per log id) | yes |
//! | created, Exited | no | yes |
//! | updated | no | yes |
//!
//! # Redelivery
//!
//! The feed is at-least-once. Dispatch attempts are deduplicated by
//! log id — attempted means attempted, the prompt is not reissued even
//! when the first attempt failed. Recompute needs no dedup; it reads
//! current state.

use crate::aggregate::OccupancyAggregator;
use crate::dispatch::{DispatchResult, NotificationDispatcher};
use gatelog_store::LogChange;
use gatelog_types::{ActorId, LogId};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{broadcast, Semaphore};
use tracing::{debug, info, warn};

/// Trigger tuning knobs.
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// Maximum concurrent side-effect workers.
    pub worker_limit: usize,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self { worker_limit: 8 }
    }
}

/// Observes every log write and fans out side effects.
///
/// Failures of either effect are logged and dropped: they never block
/// the loop, never fail the triggering write, and never prevent
/// processing of subsequent events.
pub struct IngestionTrigger {
    dispatcher: Arc<NotificationDispatcher>,
    aggregator: Arc<OccupancyAggregator>,
    workers: Arc<Semaphore>,
    /// Log ids a dispatch was already attempted for.
    ///
    /// Grows for the process lifetime, one id per entry creation, so
    /// memory tracks total scan volume since startup. A single
    /// facility's daily volume keeps this small; a long-lived
    /// deployment at higher volume would prune ids once their record
    /// exits.
    attempted: Arc<Mutex<HashSet<LogId>>>,
}

impl IngestionTrigger {
    /// Creates a trigger over the given effect components.
    #[must_use]
    pub fn new(
        dispatcher: Arc<NotificationDispatcher>,
        aggregator: Arc<OccupancyAggregator>,
        config: TriggerConfig,
    ) -> Self {
        Self {
            dispatcher,
            aggregator,
            workers: Arc::new(Semaphore::new(config.worker_limit.max(1))),
            attempted: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Drains the change feed until the store drops it.
    ///
    /// A lagged receiver (burst larger than the feed buffer) logs a
    /// warning and schedules one corrective recompute — recomputation
    /// reads current state, so skipped intermediate changes cost
    /// nothing. Missed entry creations lose their prompt; that is the
    /// at-least-once boundary of the feed, not of this loop.
    pub async fn run(self, mut feed: broadcast::Receiver<LogChange>) {
        info!("ingestion trigger started");
        loop {
            match feed.recv().await {
                Ok(change) => self.process_change(change).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "change feed lagged, recomputing occupancy");
                    self.spawn_recompute().await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        info!("ingestion trigger stopped: feed closed");
    }

    /// Processes one observed change.
    ///
    /// Exposed so tests can drive the trigger without a feed; `run`
    /// calls this for every received change.
    pub async fn process_change(&self, change: LogChange) {
        if change.is_entry_creation() && self.first_attempt(change.record.log_id) {
            self.spawn_dispatch(change.record.log_id, change.record.actor_id.clone())
                .await;
        }
        self.spawn_recompute().await;
    }

    /// Records a dispatch attempt; `true` only the first time.
    fn first_attempt(&self, log_id: LogId) -> bool {
        self.attempted.lock().insert(log_id)
    }

    async fn spawn_dispatch(&self, log_id: LogId, actor_id: ActorId) {
        let Ok(permit) = self.workers.clone().acquire_owned().await else {
            return;
        };
        let dispatcher = Arc::clone(&self.dispatcher);
        tokio::spawn(async move {
            match dispatcher.dispatch_entry_prompt(log_id, &actor_id).await {
                Ok(DispatchResult::Sent(_)) => {}
                Ok(DispatchResult::Skipped(reason)) => {
                    debug!(%log_id, ?reason, "entry prompt skipped");
                }
                Ok(DispatchResult::Failed(cause)) => {
                    warn!(%log_id, cause, "entry prompt failed, dropped");
                }
                Err(e) => {
                    warn!(%log_id, error = %e, "dispatch aborted by store error");
                }
            }
            drop(permit);
        });
    }

    async fn spawn_recompute(&self) {
        let Ok(permit) = self.workers.clone().acquire_owned().await else {
            return;
        };
        let aggregator = Arc::clone(&self.aggregator);
        tokio::spawn(async move {
            if let Err(e) = aggregator.recompute().await {
                warn!(error = %e, "occupancy recompute failed, dropped");
            }
            drop(permit);
        });
    }
}
