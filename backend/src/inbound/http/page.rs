//! Bridge from session state to rendered admin pages.
//!
//! Flashes are drained and the session persisted before the renderer runs,
//! and the page is rendered into a buffer, so no body bytes leave the server
//! until the flash clearing is durable.

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use tracing::error;

use crate::domain::{Page, PageRenderer, RenderContext, RenderError, SessionError, SessionStore};

/// Failures that abort a page render.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// The session could not be read or committed.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The template failed to execute.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Per-request page rendering scope.
pub struct PageContext<'a> {
    session: &'a dyn SessionStore,
    renderer: &'a dyn PageRenderer,
}

impl<'a> PageContext<'a> {
    /// Bind a live session to the renderer for one request.
    pub fn new(session: &'a dyn SessionStore, renderer: &'a dyn PageRenderer) -> Self {
        Self { session, renderer }
    }

    /// Move session state into `context`.
    ///
    /// Drains pending flashes, persists the session so they cannot be shown
    /// again, then copies the logged-in user. Caller-supplied page fields are
    /// left untouched.
    ///
    /// # Examples
    /// ```
    /// use media_backend::domain::{Flash, RenderContext, User};
    /// use media_backend::inbound::http::page::PageContext;
    /// use media_backend::outbound::render::HtmlRenderer;
    /// use media_backend::outbound::session::MemorySession;
    ///
    /// let session = MemorySession::new()
    ///     .with_flashes(["welcome"])
    ///     .with_user(&User::new(1, "admin"))?;
    /// let context = PageContext::new(&session, &HtmlRenderer)
    ///     .build(RenderContext::default())?;
    /// assert_eq!(context.flashes, vec![Flash::from("welcome")]);
    /// assert_eq!(context.user.map(|user| user.name), Some("admin".to_owned()));
    /// # Ok::<(), media_backend::inbound::http::page::PageError>(())
    /// ```
    pub fn build(&self, mut context: RenderContext) -> Result<RenderContext, PageError> {
        context.flashes = self.session.take_flashes()?;
        self.session.persist()?;
        context.user = self.session.user();
        Ok(context)
    }

    /// Render `page` and return the HTTP response.
    ///
    /// Session failures and render failures both yield `500` with the error
    /// text as a plain-text body.
    pub fn respond(&self, page: Page, context: RenderContext) -> HttpResponse {
        match self.render(page, context) {
            Ok(html) => HttpResponse::Ok()
                .content_type(ContentType::html())
                .body(html),
            Err(err) => {
                error!(page = page.name(), error = %err, "page render failed");
                HttpResponse::InternalServerError()
                    .content_type(ContentType::plaintext())
                    .body(format!("500 when executing: {err}"))
            }
        }
    }

    fn render(&self, page: Page, context: RenderContext) -> Result<String, PageError> {
        let context = self.build(context)?;
        Ok(self.renderer.render(page, &context)?)
    }
}
