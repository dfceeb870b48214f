//! Actix-backed implementation of the [`SessionStore`] port.
//!
//! Wraps the cookie session so page handlers only deal with flashes and the
//! logged-in user. Actix commits session changes when the middleware builds
//! the response head, which always precedes the body.

use std::cell::Cell;

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Flash, SessionError, SessionStore, User};

pub(crate) const USER_KEY: &str = "user";
pub(crate) const FLASHES_KEY: &str = "_flash";

/// Request-scoped session handle.
#[derive(Clone)]
pub struct SessionContext {
    session: Session,
    flashes_taken: Cell<bool>,
}

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            flashes_taken: Cell::new(false),
        }
    }

    fn stored_flashes(&self) -> Result<Vec<Flash>, SessionError> {
        self.session
            .get::<Vec<Flash>>(FLASHES_KEY)
            .map(Option::unwrap_or_default)
            .map_err(|error| SessionError::Read {
                key: FLASHES_KEY,
                message: error.to_string(),
            })
    }
}

impl SessionStore for SessionContext {
    fn take_flashes(&self) -> Result<Vec<Flash>, SessionError> {
        if self.flashes_taken.get() {
            return Ok(Vec::new());
        }
        let flashes = self.stored_flashes()?;
        self.flashes_taken.set(true);
        Ok(flashes)
    }

    fn push_flash(&self, flash: Flash) -> Result<(), SessionError> {
        // Flashes already handed out must not reappear alongside the new one.
        let mut flashes = if self.flashes_taken.replace(false) {
            Vec::new()
        } else {
            self.stored_flashes()?
        };
        flashes.push(flash);
        self.session
            .insert(FLASHES_KEY, flashes)
            .map_err(|error| SessionError::Write {
                key: FLASHES_KEY,
                message: error.to_string(),
            })
    }

    fn user(&self) -> Option<User> {
        match self.session.get::<User>(USER_KEY) {
            Ok(user) => user,
            Err(error) => panic!("session value `{USER_KEY}` is not a user: {error}"),
        }
    }

    fn set_user(&self, user: &User) -> Result<(), SessionError> {
        self.session
            .insert(USER_KEY, user)
            .map_err(|error| SessionError::Write {
                key: USER_KEY,
                message: error.to_string(),
            })
    }

    fn persist(&self) -> Result<(), SessionError> {
        if self.flashes_taken.get() {
            self.session.remove(FLASHES_KEY);
            debug!("flash queue cleared; commit pending on response head");
        }
        Ok(())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
