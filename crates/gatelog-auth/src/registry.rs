//! Secret lookup capability.
//!
//! The gateway asks "what is the expected secret for this subject in
//! this role" and nothing more. [`StaticRegistry`] is the in-process
//! implementation (seeded at startup); a deployment backed by a real
//! secret store implements [`SecretRegistry`] the same way.

use gatelog_types::{Role, SubjectId};
use std::collections::HashMap;

/// A shared secret.
///
/// Wraps the raw bytes so secrets don't leak through `Debug` output or
/// accidental display.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Creates a secret from raw material.
    #[must_use]
    pub fn new(material: impl Into<Vec<u8>>) -> Self {
        Self(material.into())
    }

    /// Returns the secret bytes for comparison.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Secret {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Lookup capability for expected secrets, partitioned by role.
///
/// A subject registered as an edge scanner is invisible to an
/// administrator lookup and vice versa.
pub trait SecretRegistry: Send + Sync {
    /// Returns the expected secret for `subject` in `role`, if
    /// registered.
    fn secret_for(&self, subject: &SubjectId, role: Role) -> Option<Secret>;
}

/// In-memory registry seeded at startup.
///
/// # Example
///
/// ```
/// use gatelog_auth::{SecretRegistry, StaticRegistry};
/// use gatelog_types::{Role, SubjectId};
///
/// let registry = StaticRegistry::new()
///     .with_secret("scanner-001", Role::EdgeScanner, "device-secret")
///     .with_secret("admin-001", Role::Administrator, "admin-secret");
///
/// let scanner = SubjectId::new("scanner-001");
/// assert!(registry.secret_for(&scanner, Role::EdgeScanner).is_some());
/// assert!(registry.secret_for(&scanner, Role::Administrator).is_none());
/// ```
#[derive(Debug, Default)]
pub struct StaticRegistry {
    scanners: HashMap<SubjectId, Secret>,
    administrators: HashMap<SubjectId, Secret>,
}

impl StaticRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a secret for a subject in a role (builder style).
    #[must_use]
    pub fn with_secret(
        mut self,
        subject: impl Into<String>,
        role: Role,
        secret: impl Into<Vec<u8>>,
    ) -> Self {
        let subject = SubjectId::new(subject);
        let secret = Secret::new(secret);
        match role {
            Role::EdgeScanner => self.scanners.insert(subject, secret),
            Role::Administrator => self.administrators.insert(subject, secret),
        };
        self
    }
}

impl SecretRegistry for StaticRegistry {
    fn secret_for(&self, subject: &SubjectId, role: Role) -> Option<Secret> {
        match role {
            Role::EdgeScanner => self.scanners.get(subject).cloned(),
            Role::Administrator => self.administrators.get(subject).cloned(),
        }
    }
}
