//! Occupancy aggregation.
//!
//! Full recomputation from the authoritative log, not incremental
//! delta-counting. Under concurrent, possibly-redelivered writes from
//! multiple untrusted scanners an increment/decrement counter
//! double-counts on redelivery and drifts on missed events; a full
//! recompute is self-correcting at the cost of O(n) work per write.
//! That ceiling is acceptable for a single facility's daily volume.

use chrono::Utc;
use gatelog_store::{EventStore, OccupancyAggregate, StoreError};
use std::sync::Arc;
use tracing::debug;

/// Owns the occupancy aggregate.
///
/// Multiple recompute invocations may race; the aggregate write is
/// last-writer-wins and a slightly stale overwrite is acceptable — the
/// next write self-corrects.
pub struct OccupancyAggregator {
    store: Arc<dyn EventStore>,
}

impl OccupancyAggregator {
    /// Creates an aggregator over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Recomputes the occupancy count and republishes the aggregate.
    ///
    /// # Errors
    ///
    /// Propagates store errors; the ingestion trigger logs and drops
    /// them (the next write triggers a corrective recompute).
    pub async fn recompute(&self) -> Result<OccupancyAggregate, StoreError> {
        let logs = self.store.list_logs().await?;
        let current_count = logs.iter().filter(|rec| rec.is_present()).count() as u64;

        let aggregate = OccupancyAggregate {
            current_count,
            updated_at: Utc::now(),
        };
        self.store.write_aggregate(aggregate).await?;
        debug!(count = current_count, "occupancy recomputed");
        Ok(aggregate)
    }
}
