//! HTTP core of the media server.
//!
//! - [`domain`]: Subsonic outcomes, envelopes, and the page rendering model.
//! - [`inbound::http`]: format negotiation, response encoding, session
//!   bridging, and the Actix handlers.
//! - [`outbound`]: the built-in HTML renderer and an in-memory session.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
