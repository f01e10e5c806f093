//! Credential gateway for gatelog.
//!
//! Validates a writer's shared secret and issues a role-scoped session
//! credential:
//!
//! ```text
//! scanner ── authenticate_device(id, secret) ──► ┌───────────────────┐
//! admin ──── authenticate_admin(id, secret) ───► │ CredentialGateway │
//!                                                │                   │
//!                   SecretRegistry (lookup) ◄────│                   │
//!                   CredentialSigner (trust) ◄───│                   │
//!                                                └───────────────────┘
//!                                                        │
//!                                   SessionCredential ◄──┘  (or AuthError)
//! ```
//!
//! # Design Principles
//!
//! - **Injected lookup capability** — the gateway never owns a secret
//!   table; [`SecretRegistry`] is a trait, swappable for a real secret
//!   store without touching gateway logic.
//! - **Timing safety** — secret comparison is constant-time
//!   (`subtle`), and unknown subjects take the same comparison path as
//!   wrong secrets.
//! - **No enumeration** — every failure is the same
//!   [`AuthError::PermissionDenied`]; the caller learns nothing about
//!   *why*.
//! - **No rate limiting here** — the gateway is a plain value so a
//!   caller can wrap it with one.

pub mod credential;
pub mod error;
pub mod gateway;
pub mod registry;

pub use credential::{Claims, CredentialSigner, SessionCredential, Sha256Signer};
pub use error::AuthError;
pub use gateway::CredentialGateway;
pub use registry::{Secret, SecretRegistry, StaticRegistry};
