//! Subsonic wire layer: format negotiation, envelope encoding, and the Actix
//! responder that ties them together.

mod encode;
mod format;
mod xml;

pub use encode::{EncodeError, Encoded, best_effort_encode, try_encode};
pub use format::Format;

use actix_web::body::BoxBody;
use actix_web::{HttpRequest, HttpResponse, Responder};

use crate::domain::ApiOutcome;

/// Responder encoding an [`ApiOutcome`] in the negotiated [`Format`].
///
/// Always answers `200 OK`, including for application errors.
///
/// # Examples
/// ```
/// use media_backend::domain::ApiOutcome;
/// use media_backend::inbound::http::subsonic::{Format, SubsonicReply};
///
/// async fn ping(format: Format) -> SubsonicReply {
///     SubsonicReply::new(ApiOutcome::ok(), format)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SubsonicReply {
    outcome: ApiOutcome,
    format: Format,
}

impl SubsonicReply {
    /// Pair an outcome with the format resolved for this request.
    #[must_use]
    pub fn new(outcome: ApiOutcome, format: Format) -> Self {
        Self { outcome, format }
    }
}

impl Responder for SubsonicReply {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        let encoded = best_effort_encode(&self.outcome, &self.format);
        HttpResponse::Ok()
            .content_type(encoded.content_type)
            .body(encoded.body)
    }
}
