//! Store layer errors.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`StoreError::Unavailable`] | `STORE_UNAVAILABLE` | Yes |
//! | [`StoreError::LogNotFound`] | `STORE_LOG_NOT_FOUND` | No |
//! | [`StoreError::InvalidTransition`] | `STORE_INVALID_TRANSITION` | No |
//!
//! `Unavailable` is the connectivity surface: online callers propagate
//! it, visitor-originated reason writes route to the offline queue.

use gatelog_types::{ErrorCode, LogId};
use thiserror::Error;

/// Error from a store operation.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Store unreachable (offline, or the backing service is down).
    #[error("store unavailable")]
    Unavailable,

    /// No record exists for the given id.
    #[error("log record not found: {0}")]
    LogNotFound(LogId),

    /// Attempted `Exited → Entered` or a duplicate exit write.
    ///
    /// Rejected at the write boundary, never silently applied.
    #[error("invalid status transition for log {log_id}")]
    InvalidTransition {
        /// The record the write targeted.
        log_id: LogId,
    },
}

impl ErrorCode for StoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unavailable => "STORE_UNAVAILABLE",
            Self::LogNotFound(_) => "STORE_LOG_NOT_FOUND",
            Self::InvalidTransition { .. } => "STORE_INVALID_TRANSITION",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatelog_types::assert_error_codes;

    fn all_variants() -> Vec<StoreError> {
        vec![
            StoreError::Unavailable,
            StoreError::LogNotFound(LogId::new()),
            StoreError::InvalidTransition {
                log_id: LogId::new(),
            },
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "STORE_");
    }

    #[test]
    fn only_unavailable_is_recoverable() {
        assert!(StoreError::Unavailable.is_recoverable());
        assert!(!StoreError::LogNotFound(LogId::new()).is_recoverable());
        assert!(!StoreError::InvalidTransition {
            log_id: LogId::new()
        }
        .is_recoverable());
    }
}
