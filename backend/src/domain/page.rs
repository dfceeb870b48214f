//! Page rendering model: targets, render context, and the renderer port.

use serde::Serialize;

use super::{Flash, User};

/// Template entry point every page is executed through.
pub const LAYOUT_ENTRY: &str = "layout";

/// Pages of the admin web UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Home,
    CreateUser,
    ChangePassword,
}

impl Page {
    /// Stable target name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Home => "home",
            Self::CreateUser => "create_user",
            Self::ChangePassword => "change_password",
        }
    }

    /// Templates nested inside the layout, outermost first.
    ///
    /// Every page except the login form includes the `user` partial.
    #[must_use]
    pub fn nested(self) -> &'static [&'static str] {
        match self {
            Self::Login => &["pages/login"],
            Self::Home => &["user", "pages/home"],
            Self::CreateUser => &["user", "pages/create_user"],
            Self::ChangePassword => &["user", "pages/change_password"],
        }
    }
}

/// Values a page template reads. Built fresh for every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    pub flashes: Vec<Flash>,
    pub user: Option<User>,
    pub selected_user: Option<User>,
    pub all_users: Vec<User>,
    pub artist_count: u64,
    pub album_count: u64,
    pub track_count: u64,
}

/// Template execution failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("template `{template}`: {message}")]
pub struct RenderError {
    template: String,
    message: String,
}

impl RenderError {
    /// Describe a failure inside `template`.
    pub fn new(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            message: message.into(),
        }
    }
}

/// Port to the template engine.
#[cfg_attr(test, mockall::automock)]
pub trait PageRenderer: Send + Sync {
    /// Execute `page` through [`LAYOUT_ENTRY`] and return the full document.
    fn render(&self, page: Page, context: &RenderContext) -> Result<String, RenderError>;
}
