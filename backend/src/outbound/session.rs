//! In-process [`SessionStore`] used by tests and single-request tooling.
//!
//! Keeps a working copy that callers mutate and a persisted copy that only
//! changes on [`SessionStore::persist`], mirroring a real backing store.

use std::cell::RefCell;

use serde_json::Value;

use crate::domain::{Flash, SessionError, SessionStore, User};

#[derive(Debug, Clone, Default, PartialEq)]
struct SessionState {
    flashes: Vec<Flash>,
    user: Option<Value>,
}

/// Memory-backed session with an optional simulated persistence failure.
///
/// # Examples
/// ```
/// use media_backend::domain::{Flash, SessionStore};
/// use media_backend::outbound::session::MemorySession;
///
/// let session = MemorySession::new().with_flashes(["saved"]);
/// assert_eq!(session.take_flashes()?, vec![Flash::from("saved")]);
/// session.persist()?;
/// assert!(session.persisted_flashes().is_empty());
/// # Ok::<(), media_backend::domain::SessionError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemorySession {
    working: RefCell<SessionState>,
    persisted: RefCell<SessionState>,
    fail_persist: bool,
}

impl MemorySession {
    /// Empty, anonymous session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed persisted flashes, oldest first.
    #[must_use]
    pub fn with_flashes<I, F>(self, flashes: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Flash>,
    {
        let flashes: Vec<Flash> = flashes.into_iter().map(Into::into).collect();
        self.working.borrow_mut().flashes.clone_from(&flashes);
        self.persisted.borrow_mut().flashes = flashes;
        self
    }

    /// Seed a persisted user.
    pub fn with_user(self, user: &User) -> Result<Self, SessionError> {
        self.set_user(user)?;
        let stored = self.working.borrow().user.clone();
        self.persisted.borrow_mut().user = stored;
        Ok(self)
    }

    /// Seed an arbitrary value under the user key, bypassing type checks.
    #[must_use]
    pub fn with_raw_user(self, value: Value) -> Self {
        self.working.borrow_mut().user = Some(value.clone());
        self.persisted.borrow_mut().user = Some(value);
        self
    }

    /// Make every [`SessionStore::persist`] call fail.
    #[must_use]
    pub fn failing_persist(mut self) -> Self {
        self.fail_persist = true;
        self
    }

    /// Flashes as last committed to the backing store.
    #[must_use]
    pub fn persisted_flashes(&self) -> Vec<Flash> {
        self.persisted.borrow().flashes.clone()
    }

    /// Re-read the session from its committed state, as the next request would.
    #[must_use]
    pub fn reload(&self) -> Self {
        let state = self.persisted.borrow().clone();
        Self {
            working: RefCell::new(state.clone()),
            persisted: RefCell::new(state),
            fail_persist: self.fail_persist,
        }
    }
}

impl SessionStore for MemorySession {
    fn take_flashes(&self) -> Result<Vec<Flash>, SessionError> {
        Ok(std::mem::take(&mut self.working.borrow_mut().flashes))
    }

    fn push_flash(&self, flash: Flash) -> Result<(), SessionError> {
        self.working.borrow_mut().flashes.push(flash);
        Ok(())
    }

    fn user(&self) -> Option<User> {
        let raw = self.working.borrow().user.clone()?;
        match serde_json::from_value(raw) {
            Ok(user) => Some(user),
            Err(error) => panic!("session value `user` is not a user: {error}"),
        }
    }

    fn set_user(&self, user: &User) -> Result<(), SessionError> {
        let value = serde_json::to_value(user).map_err(|error| SessionError::Write {
            key: "user",
            message: error.to_string(),
        })?;
        self.working.borrow_mut().user = Some(value);
        Ok(())
    }

    fn persist(&self) -> Result<(), SessionError> {
        if self.fail_persist {
            return Err(SessionError::Persist(std::io::Error::other(
                "session store unavailable",
            )));
        }
        let state = self.working.borrow().clone();
        *self.persisted.borrow_mut() = state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn flashes_survive_until_persisted() {
        let session = MemorySession::new().with_flashes(["a", "b"]);
        assert_eq!(
            session.take_flashes().expect("take"),
            vec![Flash::from("a"), Flash::from("b")]
        );
        assert!(session.take_flashes().expect("take again").is_empty());
        assert_eq!(session.reload().take_flashes().expect("take").len(), 2);

        session.persist().expect("persist");
        assert!(session.reload().take_flashes().expect("take").is_empty());
    }

    #[rstest]
    fn failed_persist_leaves_committed_state_untouched() {
        let session = MemorySession::new().with_flashes(["a"]).failing_persist();
        session.take_flashes().expect("take");
        assert!(matches!(session.persist(), Err(SessionError::Persist(_))));
        assert_eq!(session.persisted_flashes(), vec![Flash::from("a")]);
    }

    #[rstest]
    fn user_round_trips() {
        let session = MemorySession::new();
        assert_eq!(session.user(), None);
        let user = User::new(7, "ada");
        session.set_user(&user).expect("set user");
        assert_eq!(session.user(), Some(user));
    }

    #[rstest]
    fn seeded_user_is_committed() {
        let user = User::new(3, "grace").with_admin(true);
        let session = MemorySession::new().with_user(&user).expect("seed user");
        assert_eq!(session.user(), Some(user.clone()));
        assert_eq!(session.reload().user(), Some(user));
    }

    #[rstest]
    #[should_panic(expected = "is not a user")]
    fn mistyped_user_panics() {
        let _ = MemorySession::new().with_raw_user(json!(42)).user();
    }
}
