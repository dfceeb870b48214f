//! Admin web UI handlers.
//!
//! ```text
//! GET /admin/login
//! GET /admin/home
//! ```

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, get, web};
use tracing::warn;

use crate::domain::{Flash, Page, RenderContext, SessionStore};
use crate::inbound::http::page::PageContext;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::PageState;

const LOGIN_PATH: &str = "/admin/login";

/// Render the login form.
#[get("/login")]
pub async fn login(state: web::Data<PageState>, session: SessionContext) -> HttpResponse {
    PageContext::new(&session, state.renderer.as_ref())
        .respond(Page::Login, RenderContext::default())
}

/// Render the landing page for a logged-in user.
///
/// Anonymous visitors are redirected to the login form with a flash.
#[get("/home")]
pub async fn home(state: web::Data<PageState>, session: SessionContext) -> HttpResponse {
    let Some(user) = session.user() else {
        if let Err(err) = session.push_flash(Flash::from("please login")) {
            warn!(error = %err, "failed to queue login flash");
        }
        return HttpResponse::SeeOther()
            .insert_header((LOCATION, LOGIN_PATH))
            .finish();
    };
    // No account directory is wired in yet, so the listing holds the caller only.
    let context = RenderContext {
        all_users: vec![user],
        ..RenderContext::default()
    };
    PageContext::new(&session, state.renderer.as_ref()).respond(Page::Home, context)
}
