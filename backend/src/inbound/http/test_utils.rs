//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

const TEST_COOKIE: &str = "media-session";

/// Cookie-session middleware with a fresh key and the `Secure` flag off so
/// plain-HTTP test requests carry the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(TEST_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set by `res`, detached from the response.
///
/// # Panics
/// Panics when the response did not set the session cookie.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == TEST_COOKIE)
        .expect("session cookie set")
        .into_owned()
}
