//! Domain types for the Subsonic API and the admin pages.
//!
//! Nothing here depends on Actix; inbound adapters translate these types to
//! and from HTTP.

pub mod page;
pub mod ports;
pub mod subsonic;
pub mod user;

#[cfg(test)]
pub use page::MockPageRenderer;
pub use page::{LAYOUT_ENTRY, Page, PageRenderer, RenderContext, RenderError};
pub use ports::{Flash, SessionError, SessionStore};
pub use subsonic::{
    API_VERSION, ApiOutcome, Envelope, Payload, ReservedKey, Response, Status, SubsonicError,
    XMLNS, codes,
};
pub use user::User;
