//! Session credentials and the trust-service interface.
//!
//! Credential signing/verification is an external trust-service
//! capability; [`CredentialSigner`] is the interface this subsystem
//! consumes. [`Sha256Signer`] is the local keyed-digest implementation
//! used by tests and the demo binary.

use crate::error::AuthError;
use chrono::{DateTime, Utc};
use gatelog_types::{Role, SubjectId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// A signed, role-scoped session token.
///
/// Opaque to the holder; the store's authorization layer verifies it
/// on each write. Not persisted by this subsystem beyond its validity
/// window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCredential {
    /// Authenticated subject.
    pub subject_id: SubjectId,
    /// Role the credential is scoped to.
    pub role: Role,
    /// Issuance time.
    pub issued_at: DateTime<Utc>,
    /// Trust-service signature over the claims (hex).
    pub signature: String,
}

/// Verified claims extracted from a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Authenticated subject.
    pub subject_id: SubjectId,
    /// Role the credential is scoped to.
    pub role: Role,
}

/// Trust-service capability: sign and verify credentials.
pub trait CredentialSigner: Send + Sync {
    /// Issues a signed credential scoped to `{subject, role}`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TrustService`] if signing fails.
    fn issue(
        &self,
        subject: &SubjectId,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<SessionCredential, AuthError>;

    /// Verifies a credential and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::PermissionDenied`] for a bad signature.
    fn verify(&self, credential: &SessionCredential) -> Result<Claims, AuthError>;
}

/// Keyed SHA-256 signer.
///
/// Local stand-in for the external trust service: good enough for the
/// in-process deployment and the test suites, not a substitute for a
/// real token service in a distributed one.
pub struct Sha256Signer {
    key: Vec<u8>,
}

impl Sha256Signer {
    /// Creates a signer with the given signing key.
    #[must_use]
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    fn signature_for(&self, subject: &SubjectId, role: Role, issued_at: DateTime<Utc>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.key);
        hasher.update(subject.as_str().as_bytes());
        hasher.update(role.as_str().as_bytes());
        hasher.update(issued_at.timestamp_millis().to_be_bytes());
        hex::encode(hasher.finalize())
    }
}

impl CredentialSigner for Sha256Signer {
    fn issue(
        &self,
        subject: &SubjectId,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<SessionCredential, AuthError> {
        Ok(SessionCredential {
            subject_id: subject.clone(),
            role,
            issued_at,
            signature: self.signature_for(subject, role, issued_at),
        })
    }

    fn verify(&self, credential: &SessionCredential) -> Result<Claims, AuthError> {
        let expected = self.signature_for(
            &credential.subject_id,
            credential.role,
            credential.issued_at,
        );
        let matches: bool = expected
            .as_bytes()
            .ct_eq(credential.signature.as_bytes())
            .into();
        if matches {
            Ok(Claims {
                subject_id: credential.subject_id.clone(),
                role: credential.role,
            })
        } else {
            Err(AuthError::PermissionDenied)
        }
    }
}
