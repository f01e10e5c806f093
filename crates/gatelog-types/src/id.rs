//! Identifier types for gatelog.
//!
//! `LogId` is opaque and store-assigned (UUID v4). Actor and subject
//! identifiers are externally assigned strings: a badge number, a
//! device name like `scanner-001`, an administrator account id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel actor identifier for anomalous or unauthorized scans.
///
/// Edge scanners report this when a badge could not be resolved to a
/// known actor; the entry is still logged and still counts toward
/// occupancy.
const UNKNOWN_ACTOR: &str = "UNKNOWN";

/// Identifier for one visit log record.
///
/// Assigned by the store on creation and immutable afterwards. Opaque
/// to every other component: the only legal operations are equality,
/// hashing, and display.
///
/// # Example
///
/// ```
/// use gatelog_types::LogId;
///
/// let a = LogId::new();
/// let b = LogId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogId(Uuid);

impl LogId {
    /// Creates a fresh random log id.
    ///
    /// Only stores should call this; everyone else receives ids from
    /// the store.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LogId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a visiting actor.
///
/// Externally assigned (badge/student number). The reserved
/// [`unknown`](Self::unknown) sentinel marks scans that could not be
/// attributed to a known actor.
///
/// # Example
///
/// ```
/// use gatelog_types::ActorId;
///
/// let actor = ActorId::new("s-1042");
/// assert!(!actor.is_unknown());
/// assert!(ActorId::unknown().is_unknown());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    /// Creates an actor id from an externally assigned identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the reserved sentinel for unattributed scans.
    #[must_use]
    pub fn unknown() -> Self {
        Self(UNKNOWN_ACTOR.to_string())
    }

    /// Returns `true` if this is the unattributed-scan sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_ACTOR
    }

    /// Returns the raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an authenticating subject (edge scanner or
/// administrator account).
///
/// Distinct from [`ActorId`]: subjects hold secrets and receive
/// credentials; actors are the people whose visits get logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(String);

impl SubjectId {
    /// Creates a subject id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_ids_are_unique() {
        let a = LogId::new();
        let b = LogId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn log_id_serde_roundtrip() {
        let id = LogId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: LogId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn unknown_actor_sentinel() {
        let unknown = ActorId::unknown();
        assert!(unknown.is_unknown());
        assert_eq!(unknown.as_str(), "UNKNOWN");

        let known = ActorId::new("s-1042");
        assert!(!known.is_unknown());
    }

    #[test]
    fn actor_id_display() {
        let actor = ActorId::new("s-1042");
        assert_eq!(actor.to_string(), "s-1042");
    }

    #[test]
    fn subject_id_equality() {
        assert_eq!(SubjectId::new("scanner-001"), SubjectId::new("scanner-001"));
        assert_ne!(SubjectId::new("scanner-001"), SubjectId::new("scanner-002"));
    }
}
