//! Client queue errors.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`QueueError::Io`] | `QUEUE_IO` | Yes |
//! | [`QueueError::Codec`] | `QUEUE_CODEC` | No |
//! | [`QueueError::Store`] | `QUEUE_STORE` | Delegates to the store error |

use gatelog_store::StoreError;
use gatelog_types::ErrorCode;
use thiserror::Error;

/// Error from the offline queue or a flush.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Reading or writing the queue document failed.
    #[error("queue file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The queue document on disk is not valid JSON for the expected
    /// shape. Not retried; the document needs operator attention.
    #[error("queue document corrupt: {0}")]
    Codec(#[from] serde_json::Error),

    /// A store write failed during flush; unapplied items stay queued.
    #[error("flush stopped by store error: {0}")]
    Store(#[from] StoreError),
}

impl ErrorCode for QueueError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "QUEUE_IO",
            Self::Codec(_) => "QUEUE_CODEC",
            Self::Store(_) => "QUEUE_STORE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Codec(_) => false,
            Self::Store(e) => e.is_recoverable(),
        }
    }
}
