//! Role scoping for issued credentials.

use serde::{Deserialize, Serialize};

/// The role a credential is scoped to.
///
/// Roles partition the secret registry and the write permissions the
/// store's authorization layer enforces:
///
/// | Role | Holder | May write |
/// |------|--------|-----------|
/// | `EdgeScanner` | entry/exit scanner device | log records |
/// | `Administrator` | dashboard operator | everything |
///
/// A credential issued for one role is never valid for the other; the
/// gateway scopes the signed claims to exactly the claimed role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Entry/exit scanner at a facility door.
    EdgeScanner,
    /// Administrative dashboard operator.
    Administrator,
}

impl Role {
    /// Returns the stable string form used in signed claims.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EdgeScanner => "edge-scanner",
            Self::Administrator => "administrator",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_string_forms() {
        assert_eq!(Role::EdgeScanner.as_str(), "edge-scanner");
        assert_eq!(Role::Administrator.as_str(), "administrator");
    }

    #[test]
    fn role_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Role::EdgeScanner).unwrap();
        assert_eq!(json, "\"edge-scanner\"");

        let back: Role = serde_json::from_str("\"administrator\"").unwrap();
        assert_eq!(back, Role::Administrator);
    }
}
