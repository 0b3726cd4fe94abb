//! Authenticated identity.

use serde::{Deserialize, Serialize};

/// The signed-in user a task list belongs to.
///
/// Passed explicitly into every owner-scoped operation; there is no
/// process-wide "current user".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque identifier assigned by the auth service
    pub uid: String,

    /// Email the account was registered with
    pub email: String,
}

impl Identity {
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.email, self.uid)
    }
}
