//! Ingestion, aggregation, and notification dispatch.
//!
//! The pipeline reacts to the store's change feed and fans out side
//! effects without ever blocking the writes that caused them:
//!
//! ```text
//!                 ┌──────────────────────────────────────────┐
//!                 │             IngestionTrigger             │
//! change feed ──► │  recv loop ── worker pool (Semaphore)    │
//!                 │        │                │                │
//!                 │        ▼                ▼                │
//!                 │  NotificationDispatcher OccupancyAggregator
//!                 │  (entry creations only) (every write)    │
//!                 └──────────────────────────────────────────┘
//! ```
//!
//! # Delivery semantics
//!
//! | Effect | Trigger | Guarantee |
//! |--------|---------|-----------|
//! | entry prompt | created + Entered | attempted at most once per log id |
//! | occupancy recompute | any write | eventually correct (self-correcting) |
//!
//! The change feed is at-least-once; the trigger deduplicates
//! notification attempts by log id, and recomputation is naturally
//! idempotent because it recomputes from current state rather than
//! incrementing a counter.
//!
//! Side-effect failures are logged and dropped. They never propagate
//! back to the write, never stall the loop, and are not retried here —
//! the push provider has its own retry/backoff, and re-driving from
//! this layer risks duplicate prompts.

pub mod aggregate;
pub mod dispatch;
pub mod trigger;

pub use aggregate::OccupancyAggregator;
pub use dispatch::{
    DeliveryReceipt, DispatchResult, NotificationDispatcher, ProviderError, PushPayload,
    PushProvider, SkipReason,
};
pub use trigger::{IngestionTrigger, TriggerConfig};
