//! User data model shared by the session and page layers.

use serde::{Deserialize, Serialize};

/// Account stored in the session once authentication succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Create a non-admin user.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_admin: false,
        }
    }

    /// Grant admin rights.
    #[must_use]
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}
