//! Shared HTTP adapter state.
//!
//! Page handlers accept this state via `actix_web::web::Data` so they only
//! depend on the renderer port and stay testable without templates on disk.

use std::sync::Arc;

use crate::domain::PageRenderer;

/// Dependency bundle for page handlers.
#[derive(Clone)]
pub struct PageState {
    pub renderer: Arc<dyn PageRenderer>,
}

impl PageState {
    /// Bundle the renderer used for every admin page.
    pub fn new(renderer: Arc<dyn PageRenderer>) -> Self {
        Self { renderer }
    }
}
