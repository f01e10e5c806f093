//! Unified error interface for gatelog crates.
//!
//! Every error enum in the workspace implements [`ErrorCode`] so that
//! callers, logs, and retry loops can treat failures uniformly:
//!
//! - **Machine-readable codes** for programmatic handling
//! - **Recoverability** for retry/queue decisions (the offline queue
//!   keys off this to decide whether a flush failure is retryable)
//!
//! # Example
//!
//! ```
//! use gatelog_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum MyError {
//!     Unavailable,
//!     Denied,
//! }
//!
//! impl ErrorCode for MyError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Unavailable => "MY_UNAVAILABLE",
//!             Self::Denied => "MY_DENIED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Unavailable)
//!     }
//! }
//!
//! assert!(MyError::Unavailable.is_recoverable());
//! ```

/// Unified error code interface.
///
/// # Code Format
///
/// - UPPER_SNAKE_CASE, prefixed with the owning domain
///   (`STORE_`, `AUTH_`, `QUEUE_`, `DISPATCH_`)
/// - Stable once defined; changing a code is a breaking change
///
/// # Recoverability
///
/// An error is recoverable when retrying the same operation may
/// succeed without a code or configuration change: store connectivity
/// loss, provider timeouts. Permission denials and invalid transitions
/// are not recoverable.
pub trait ErrorCode {
    /// Returns the machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code follows workspace conventions.
///
/// Checks the code is non-empty, UPPER_SNAKE_CASE, and carries the
/// expected domain prefix.
///
/// # Panics
///
/// Panics with a descriptive message if any check fails.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Asserts conventions for every variant of an error enum at once.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

/// Checks if a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
