//! Log record, actor profile, and occupancy aggregate types.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use gatelog_types::{ActorId, LogId};
use serde::{Deserialize, Serialize};

/// Presence status of a visit.
///
/// Monotonic per record: a visit transitions at most once from
/// `Entered` to `Exited`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitStatus {
    /// Actor is currently inside the facility.
    Entered,
    /// Actor has left; `exited_at` is set.
    Exited,
}

/// One physical visit attempt.
///
/// # Invariants
///
/// - `exited_at` is present iff `status == Exited`
/// - `entered_at` is immutable after creation
/// - `reason`, if present, was written after `entered_at`
///
/// The invariants are enforced at the write boundary:
/// [`transition_to_exited`](Self::transition_to_exited) is the only way
/// to change status, and it rejects repeat or reverse transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Store-assigned opaque identifier.
    pub log_id: LogId,
    /// Visiting actor, or [`ActorId::unknown`] for anomalous scans.
    pub actor_id: ActorId,
    /// Presence status.
    pub status: VisitStatus,
    /// Entry timestamp, set at creation.
    pub entered_at: DateTime<Utc>,
    /// Exit timestamp, set exactly once on the Exited transition.
    pub exited_at: Option<DateTime<Utc>>,
    /// Visit reason, submitted by the actor; may remain absent.
    pub reason: Option<String>,
}

impl LogRecord {
    /// Creates a fresh Entered record.
    #[must_use]
    pub fn new(log_id: LogId, actor_id: ActorId, entered_at: DateTime<Utc>) -> Self {
        Self {
            log_id,
            actor_id,
            status: VisitStatus::Entered,
            entered_at,
            exited_at: None,
            reason: None,
        }
    }

    /// Returns `true` if the actor is currently present.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.status == VisitStatus::Entered
    }

    /// Performs the `Entered → Exited` transition.
    ///
    /// This is a targeted field update: only `status` and `exited_at`
    /// change. A record that already exited is rejected — the exit
    /// timestamp is written exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidTransition`] if the record is
    /// already `Exited`.
    pub fn transition_to_exited(&mut self, exited_at: DateTime<Utc>) -> Result<(), StoreError> {
        if self.status == VisitStatus::Exited {
            return Err(StoreError::InvalidTransition {
                log_id: self.log_id,
            });
        }
        self.status = VisitStatus::Exited;
        self.exited_at = Some(exited_at);
        Ok(())
    }

    /// Sets the visit reason.
    ///
    /// Last write wins: a replayed offline submission overwrites a
    /// prior online one. This favors availability over strict
    /// at-most-once-write semantics.
    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = Some(reason.into());
    }
}

/// Profile of a known actor.
///
/// Created or updated on first registration/login; the push
/// destination is refreshed whenever the actor's device re-registers.
/// Never deleted by this subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorProfile {
    /// Actor identifier.
    pub actor_id: ActorId,
    /// Human-readable name.
    pub display_name: String,
    /// Push destination token; absence suppresses notification
    /// delivery, it is not an error.
    pub push_destination: Option<String>,
    /// Last login or device registration time.
    pub last_seen_at: DateTime<Utc>,
}

impl ActorProfile {
    /// Creates a profile without a push destination.
    #[must_use]
    pub fn new(actor_id: ActorId, display_name: impl Into<String>, seen_at: DateTime<Utc>) -> Self {
        Self {
            actor_id,
            display_name: display_name.into(),
            push_destination: None,
            last_seen_at: seen_at,
        }
    }

    /// Sets the push destination (builder style).
    #[must_use]
    pub fn with_push_destination(mut self, destination: impl Into<String>) -> Self {
        self.push_destination = Some(destination.into());
        self
    }

    /// Refreshes the push destination on device re-registration.
    ///
    /// Destination tokens rotate when the actor reinstalls or switches
    /// devices; the newest registration wins.
    pub fn register_push_destination(
        &mut self,
        destination: impl Into<String>,
        seen_at: DateTime<Utc>,
    ) {
        self.push_destination = Some(destination.into());
        self.last_seen_at = seen_at;
    }
}

/// The derived occupancy singleton.
///
/// Owned exclusively by the occupancy aggregator; every other
/// component treats it as read-only. Defined as the count of records
/// with status `Entered`, so recomputation is self-correcting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupancyAggregate {
    /// Number of actors currently present.
    pub current_count: u64,
    /// Time of the last recomputation.
    pub updated_at: DateTime<Utc>,
}
