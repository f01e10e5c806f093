//! Change feed types.
//!
//! Every create/update to a log record emits a [`LogChange`] carrying
//! the full post-write record. Delivery is at-least-once: subscribers
//! must tolerate redelivery of the same change.

use crate::record::LogRecord;
use serde::{Deserialize, Serialize};

/// Whether a change was a record creation or an update.
///
/// The ingestion trigger needs the distinction: only a *created*
/// Entered record dispatches a notification; every write triggers a
/// recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// A new record was appended.
    Created,
    /// An existing record's fields changed.
    Updated,
}

/// One observed write to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogChange {
    /// Create vs update.
    pub kind: ChangeKind,
    /// Full post-write record.
    pub record: LogRecord,
}

impl LogChange {
    /// Wraps a freshly created record.
    #[must_use]
    pub fn created(record: LogRecord) -> Self {
        Self {
            kind: ChangeKind::Created,
            record,
        }
    }

    /// Wraps an updated record.
    #[must_use]
    pub fn updated(record: LogRecord) -> Self {
        Self {
            kind: ChangeKind::Updated,
            record,
        }
    }

    /// Returns `true` if this is the creation of an Entered record —
    /// the only change that qualifies for a notification dispatch.
    #[must_use]
    pub fn is_entry_creation(&self) -> bool {
        self.kind == ChangeKind::Created && self.record.is_present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LogRecord;
    use chrono::DateTime;
    use gatelog_types::{ActorId, LogId};

    fn entered_record() -> LogRecord {
        LogRecord::new(
            LogId::new(),
            ActorId::new("s-1"),
            DateTime::from_timestamp_millis(1_000).unwrap(),
        )
    }

    #[test]
    fn entry_creation_qualifies_for_dispatch() {
        let change = LogChange::created(entered_record());
        assert!(change.is_entry_creation());
    }

    #[test]
    fn update_never_qualifies_for_dispatch() {
        let change = LogChange::updated(entered_record());
        assert!(!change.is_entry_creation());
    }

    #[test]
    fn created_exited_record_does_not_qualify() {
        let mut rec = entered_record();
        rec.transition_to_exited(DateTime::from_timestamp_millis(2_000).unwrap())
            .unwrap();
        let change = LogChange::created(rec);
        assert!(!change.is_entry_creation());
    }
}
