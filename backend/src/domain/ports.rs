//! Domain ports consumed by the page layer.
//!
//! The session store is owned by the surrounding HTTP stack. The core only
//! reads and mutates it per request through [`SessionStore`], which keeps the
//! page code testable against [`crate::outbound::session::MemorySession`].

use serde::{Deserialize, Serialize};

use super::User;

/// One-shot notification shown on the next page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flash(String);

impl Flash {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Message text.
    #[must_use]
    pub fn message(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Flash {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Failures raised by a session backend.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A stored value could not be decoded.
    #[error("failed to read `{key}` from session: {message}")]
    Read { key: &'static str, message: String },
    /// A value could not be staged for storage.
    #[error("failed to write `{key}` to session: {message}")]
    Write { key: &'static str, message: String },
    /// The backing store rejected the commit.
    #[error("failed to persist session: {0}")]
    Persist(#[from] std::io::Error),
}

/// Narrow capability over a request-scoped session.
///
/// Implementations hold at most one user and an ordered flash queue.
pub trait SessionStore {
    /// Remove and return every pending flash, oldest first.
    ///
    /// The queue is empty from the caller's point of view afterwards; the
    /// clearing becomes durable on the next [`SessionStore::persist`].
    fn take_flashes(&self) -> Result<Vec<Flash>, SessionError>;

    /// Append a flash for the next page render.
    fn push_flash(&self, flash: Flash) -> Result<(), SessionError>;

    /// The authenticated user, or `None` for anonymous sessions.
    ///
    /// # Panics
    /// Panics when the stored value is not a [`User`]. Only this crate writes
    /// the key, so a mismatch means the session contract is broken.
    fn user(&self) -> Option<User>;

    /// Record the authenticated user.
    fn set_user(&self, user: &User) -> Result<(), SessionError>;

    /// Commit pending mutations to the backing store.
    fn persist(&self) -> Result<(), SessionError>;
}
