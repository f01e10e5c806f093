//! Shared event log store for gatelog.
//!
//! The store is the single coordination point of the system: edge
//! scanners append visit records, the pipeline observes the change
//! feed, visitor devices write reasons, dashboards read the aggregate.
//!
//! ```text
//! scanner ──create_log──► ┌────────────┐ ──LogChange──► pipeline
//! scanner ──mark_exited─► │ EventStore │ ──LogChange──► pipeline
//! visitor ──set_reason──► │            │ ◄─write_aggregate── aggregator
//! dashboard ◄─read_aggregate┘          │
//!                         └────────────┘
//! ```
//!
//! # Consistency model
//!
//! Reads and writes of a single record are strongly consistent; the
//! change feed is at-least-once and eventually consistent across
//! subscribers. Fields of a [`LogRecord`] are independently
//! overwritable except the `Entered → Exited` transition, which is a
//! targeted, validated field update.
//!
//! [`MemoryStore`] is the in-process implementation used by tests and
//! the demo binary. A production deployment would implement
//! [`EventStore`] against a remote realtime document store; loss of
//! connectivity surfaces as [`StoreError::Unavailable`] either way.

pub mod change;
pub mod error;
pub mod memory;
pub mod record;
pub mod store;

pub use change::{ChangeKind, LogChange};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use record::{ActorProfile, LogRecord, OccupancyAggregate, VisitStatus};
pub use store::EventStore;
