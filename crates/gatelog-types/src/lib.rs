//! Shared identifier and error primitives for gatelog.
//!
//! This crate is the bottom of the dependency graph:
//!
//! ```text
//! gatelog-types    : LogId, ActorId, SubjectId, Role, ErrorCode
//!     ↑        ↑
//! gatelog-store  gatelog-auth
//!     ↑
//! gatelog-pipeline / gatelog-client
//!     ↑
//! gatelog-cli
//! ```
//!
//! Nothing here touches the store or the network; it is safe for every
//! other crate (and external integrations) to depend on.

pub mod error;
pub mod id;
pub mod role;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{ActorId, LogId, SubjectId};
pub use role::Role;
