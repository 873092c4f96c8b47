//! Identity directory record.

use serde::{Deserialize, Serialize};

use pocketledger_core::{Entity, IdentityId};

/// A signed-up identity.
///
/// Immutable once created. Emails are compared exactly (case-sensitive, no
/// trimming), which is also how the directory enforces uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub email: String,
}

impl Identity {
    /// New identity with a fresh id.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: IdentityId::new(),
            email: email.into(),
        }
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email == email
    }
}

impl Entity for Identity {
    type Id = IdentityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
