//! The credential gateway.

use crate::credential::{CredentialSigner, SessionCredential};
use crate::error::AuthError;
use crate::registry::{Secret, SecretRegistry};
use chrono::Utc;
use gatelog_types::{Role, SubjectId};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

/// Dummy secret compared against when the subject is unknown.
///
/// Keeps the unknown-subject path on the same constant-time comparison
/// as the wrong-secret path, so response timing does not reveal
/// whether an identifier exists.
const DUMMY_SECRET: &[u8] = b"gatelog-dummy-comparison-secret";

/// Validates shared secrets and issues role-scoped credentials.
///
/// The gateway holds two injected capabilities and no state of its
/// own, so callers are free to wrap it (rate limiting, auditing)
/// without touching its logic.
///
/// # Example
///
/// ```
/// use gatelog_auth::{CredentialGateway, Sha256Signer, StaticRegistry};
/// use gatelog_types::Role;
/// use std::sync::Arc;
///
/// let registry = StaticRegistry::new()
///     .with_secret("scanner-001", Role::EdgeScanner, "device-secret");
/// let gateway = CredentialGateway::new(
///     Arc::new(registry),
///     Arc::new(Sha256Signer::new("signing-key")),
/// );
///
/// let cred = gateway.authenticate_device("scanner-001", b"device-secret").unwrap();
/// assert_eq!(cred.role, Role::EdgeScanner);
///
/// assert!(gateway.authenticate_device("scanner-001", b"wrong").is_err());
/// ```
pub struct CredentialGateway {
    registry: Arc<dyn SecretRegistry>,
    signer: Arc<dyn CredentialSigner>,
}

impl CredentialGateway {
    /// Creates a gateway over the given lookup and signing capabilities.
    #[must_use]
    pub fn new(registry: Arc<dyn SecretRegistry>, signer: Arc<dyn CredentialSigner>) -> Self {
        Self { registry, signer }
    }

    /// Validates `presented_secret` for `subject` in `claimed_role`
    /// and issues a credential scoped to exactly that pair.
    ///
    /// # Errors
    ///
    /// - [`AuthError::PermissionDenied`] for unknown subject or wrong
    ///   secret — deliberately indistinguishable
    /// - [`AuthError::TrustService`] if the signer fails
    pub fn issue_credential(
        &self,
        subject: &SubjectId,
        presented_secret: &[u8],
        claimed_role: Role,
    ) -> Result<SessionCredential, AuthError> {
        let expected = self.registry.secret_for(subject, claimed_role);
        if !secret_matches(expected.as_ref(), presented_secret) {
            warn!(subject = %subject, role = %claimed_role, "authentication rejected");
            return Err(AuthError::PermissionDenied);
        }

        let credential = self.signer.issue(subject, claimed_role, Utc::now())?;
        debug!(subject = %subject, role = %claimed_role, "credential issued");
        Ok(credential)
    }

    /// Authenticates an edge scanner device.
    pub fn authenticate_device(
        &self,
        device_id: impl Into<String>,
        secret: &[u8],
    ) -> Result<SessionCredential, AuthError> {
        self.issue_credential(&SubjectId::new(device_id), secret, Role::EdgeScanner)
    }

    /// Authenticates an administrator account.
    pub fn authenticate_admin(
        &self,
        admin_id: impl Into<String>,
        secret: &[u8],
    ) -> Result<SessionCredential, AuthError> {
        self.issue_credential(&SubjectId::new(admin_id), secret, Role::Administrator)
    }
}

/// Constant-time secret comparison.
///
/// An unknown subject compares the presented secret against
/// [`DUMMY_SECRET`] and discards the (always-false) result through the
/// same code path as a real mismatch.
fn secret_matches(expected: Option<&Secret>, presented: &[u8]) -> bool {
    let (expected_bytes, known) = match expected {
        Some(secret) => (secret.as_bytes(), subtle::Choice::from(1)),
        None => (DUMMY_SECRET, subtle::Choice::from(0)),
    };
    bool::from(presented.ct_eq(expected_bytes) & known)
}
