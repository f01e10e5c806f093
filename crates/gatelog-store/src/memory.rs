//! In-process [`EventStore`] implementation.
//!
//! Backs the test suites and the demo binary. The change feed is a
//! `tokio::sync::broadcast` channel, which gives subscribers the same
//! at-least-once, may-lag semantics a remote store's push subscription
//! has.
//!
//! # Availability toggle
//!
//! [`set_available`](MemoryStore::set_available) flips every operation
//! into [`StoreError::Unavailable`]. Client code uses this to exercise
//! the offline path; a remote-store implementation would surface the
//! same error on connectivity loss.

use crate::change::LogChange;
use crate::error::StoreError;
use crate::record::{ActorProfile, LogRecord, OccupancyAggregate};
use crate::store::EventStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatelog_types::{ActorId, LogId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

/// Default change feed buffer.
///
/// A burst larger than this lags slow subscribers; the pipeline
/// resynchronizes with a recompute when that happens.
const DEFAULT_FEED_CAPACITY: usize = 256;

#[derive(Default)]
struct Tables {
    logs: HashMap<LogId, LogRecord>,
    /// Insertion order, so `list_logs` is deterministic.
    order: Vec<LogId>,
    actors: HashMap<ActorId, ActorProfile>,
    aggregate: Option<OccupancyAggregate>,
}

/// Thread-safe in-memory store with a broadcast change feed.
pub struct MemoryStore {
    tables: RwLock<Tables>,
    feed: broadcast::Sender<LogChange>,
    available: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store with the default feed buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_feed_capacity(DEFAULT_FEED_CAPACITY)
    }

    /// Creates an empty store with an explicit feed buffer.
    ///
    /// Tests use a tiny buffer to provoke subscriber lag.
    #[must_use]
    pub fn with_feed_capacity(capacity: usize) -> Self {
        let (feed, _) = broadcast::channel(capacity);
        Self {
            tables: RwLock::new(Tables::default()),
            feed,
            available: AtomicBool::new(true),
        }
    }

    /// Marks the store reachable or unreachable.
    ///
    /// While unreachable every operation returns
    /// [`StoreError::Unavailable`]; already-subscribed feed receivers
    /// keep their buffered changes.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns `true` if the store is currently reachable.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }

    fn emit(&self, change: LogChange) {
        // No subscribers is fine: send only fails when nobody listens.
        let _ = self.feed.send(change);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create_log(
        &self,
        actor_id: ActorId,
        entered_at: DateTime<Utc>,
    ) -> Result<LogId, StoreError> {
        self.check_available()?;

        let log_id = LogId::new();
        let record = LogRecord::new(log_id, actor_id, entered_at);
        {
            let mut tables = self.tables.write();
            tables.logs.insert(log_id, record.clone());
            tables.order.push(log_id);
        }
        self.emit(LogChange::created(record));
        Ok(log_id)
    }

    async fn mark_exited(
        &self,
        log_id: LogId,
        exited_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.check_available()?;

        let record = {
            let mut tables = self.tables.write();
            let record = tables
                .logs
                .get_mut(&log_id)
                .ok_or(StoreError::LogNotFound(log_id))?;
            record.transition_to_exited(exited_at)?;
            record.clone()
        };
        self.emit(LogChange::updated(record));
        Ok(())
    }

    async fn set_reason(&self, log_id: LogId, reason: &str) -> Result<(), StoreError> {
        self.check_available()?;

        let record = {
            let mut tables = self.tables.write();
            let record = tables
                .logs
                .get_mut(&log_id)
                .ok_or(StoreError::LogNotFound(log_id))?;
            record.set_reason(reason);
            record.clone()
        };
        self.emit(LogChange::updated(record));
        Ok(())
    }

    async fn get_log(&self, log_id: LogId) -> Result<LogRecord, StoreError> {
        self.check_available()?;

        self.tables
            .read()
            .logs
            .get(&log_id)
            .cloned()
            .ok_or(StoreError::LogNotFound(log_id))
    }

    async fn list_logs(&self) -> Result<Vec<LogRecord>, StoreError> {
        self.check_available()?;

        let tables = self.tables.read();
        Ok(tables
            .order
            .iter()
            .filter_map(|id| tables.logs.get(id).cloned())
            .collect())
    }

    async fn get_actor(&self, actor_id: &ActorId) -> Result<Option<ActorProfile>, StoreError> {
        self.check_available()?;
        Ok(self.tables.read().actors.get(actor_id).cloned())
    }

    async fn upsert_actor(&self, profile: ActorProfile) -> Result<(), StoreError> {
        self.check_available()?;
        self.tables
            .write()
            .actors
            .insert(profile.actor_id.clone(), profile);
        Ok(())
    }

    async fn read_aggregate(&self) -> Result<Option<OccupancyAggregate>, StoreError> {
        self.check_available()?;
        Ok(self.tables.read().aggregate)
    }

    async fn write_aggregate(&self, aggregate: OccupancyAggregate) -> Result<(), StoreError> {
        self.check_available()?;
        self.tables.write().aggregate = Some(aggregate);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<LogChange> {
        self.feed.subscribe()
    }
}
