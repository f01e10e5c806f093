//! The [`EventStore`] abstraction.
//!
//! The design treats the store as given external infrastructure with
//! request/response and subscribe/notify operations over a
//! hierarchical path space (`logs/{log_id}`, `actors/{actor_id}`,
//! `aggregate`). This trait is that surface, typed.
//!
//! # Write semantics
//!
//! Single-record writes are strongly consistent; field-granular
//! last-write-wins applies across independent writers, except the
//! `Entered → Exited` transition which implementations must perform as
//! a validated, targeted field update — never a blind record
//! overwrite.

use crate::change::LogChange;
use crate::error::StoreError;
use crate::record::{ActorProfile, LogRecord, OccupancyAggregate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatelog_types::{ActorId, LogId};
use tokio::sync::broadcast;

/// Durable append/update log of entry/exit records plus the actor
/// registry and the occupancy singleton.
///
/// Implementations must be shareable across tasks
/// (`Arc<dyn EventStore>`): the ingestion pipeline, the aggregator,
/// and client code all hold the same handle.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends an Entered record and returns its store-assigned id.
    ///
    /// Emits a `Created` change on the feed.
    async fn create_log(
        &self,
        actor_id: ActorId,
        entered_at: DateTime<Utc>,
    ) -> Result<LogId, StoreError>;

    /// Transitions a record to Exited.
    ///
    /// Targeted field update: sets `status` and `exited_at` only.
    /// Emits an `Updated` change on the feed.
    ///
    /// # Errors
    ///
    /// - [`StoreError::LogNotFound`] for an unknown id
    /// - [`StoreError::InvalidTransition`] if the record already exited
    async fn mark_exited(
        &self,
        log_id: LogId,
        exited_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Writes the visit reason onto a record (last write wins).
    ///
    /// Emits an `Updated` change on the feed.
    async fn set_reason(&self, log_id: LogId, reason: &str) -> Result<(), StoreError>;

    /// Reads one record.
    async fn get_log(&self, log_id: LogId) -> Result<LogRecord, StoreError>;

    /// Reads the full log.
    ///
    /// The aggregator's full-scan recompute reads this; the log is
    /// bounded to a single facility's daily volume.
    async fn list_logs(&self) -> Result<Vec<LogRecord>, StoreError>;

    /// Reads an actor profile, `None` if unknown.
    async fn get_actor(&self, actor_id: &ActorId) -> Result<Option<ActorProfile>, StoreError>;

    /// Creates or replaces an actor profile.
    async fn upsert_actor(&self, profile: ActorProfile) -> Result<(), StoreError>;

    /// Reads the occupancy aggregate, `None` before first recompute.
    async fn read_aggregate(&self) -> Result<Option<OccupancyAggregate>, StoreError>;

    /// Overwrites the occupancy aggregate (last writer wins).
    async fn write_aggregate(&self, aggregate: OccupancyAggregate) -> Result<(), StoreError>;

    /// Subscribes to the change feed.
    ///
    /// At-least-once delivery; a slow subscriber may observe a lagged
    /// receiver error and should resynchronize by recomputing from
    /// current state rather than replaying.
    fn subscribe(&self) -> broadcast::Receiver<LogChange>;
}
