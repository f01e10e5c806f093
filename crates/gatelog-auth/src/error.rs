//! Authentication errors.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`AuthError::PermissionDenied`] | `AUTH_PERMISSION_DENIED` | No |
//! | [`AuthError::TrustService`] | `AUTH_TRUST_SERVICE` | Yes |

use gatelog_types::ErrorCode;
use thiserror::Error;

/// Error from credential issuance or verification.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Bad credentials.
    ///
    /// Deliberately carries no detail: unknown subject and wrong
    /// secret are indistinguishable to the caller, which prevents
    /// identifier enumeration.
    #[error("permission denied")]
    PermissionDenied,

    /// The external trust service failed to sign or verify.
    #[error("trust service failure: {0}")]
    TrustService(String),
}

impl ErrorCode for AuthError {
    fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "AUTH_PERMISSION_DENIED",
            Self::TrustService(_) => "AUTH_TRUST_SERVICE",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::TrustService(_))
    }
}
