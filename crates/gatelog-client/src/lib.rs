//! Client-side reason submission with offline fallback.
//!
//! Devices submit visit reasons against a store that may be
//! unreachable. The submitter degrades from direct write to a durable
//! local queue, and a reconnect replays the queue:
//!
//! ```text
//! submit ──► set_reason ──ok──► Applied
//!                │
//!           Unavailable
//!                ▼
//!          PendingQueue (JSON document on disk) ──► Queued
//!                │
//!          reconnect ──► flush ──► set_reason per item, in order
//! ```
//!
//! The queue survives process restarts; the flush removes only what it
//! actually applied, so a crash mid-flush re-replays rather than loses.
//! Replayed writes are last-write-wins on the reason field.

pub mod error;
pub mod queue;
pub mod submit;

pub use error::QueueError;
pub use queue::{FlushReport, PendingMutation, PendingQueue};
pub use submit::{ReasonSubmitter, SubmitOutcome};
