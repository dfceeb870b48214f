//! Wire format negotiation from the `f` and `callback` query parameters.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::inbound::http::query::QueryParams;

const FORMAT_PARAM: &str = "f";
const CALLBACK_PARAM: &str = "callback";

/// Encoding requested by the client, resolved once per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Format {
    /// `application/xml`; used when `f` is absent or unrecognised.
    #[default]
    Xml,
    /// `application/json`.
    Json,
    /// `application/javascript`: the JSON envelope wrapped in `callback(...);`.
    ///
    /// The callback is taken verbatim from the request and is neither escaped
    /// nor validated. Do not expose JSONP to untrusted callers without
    /// validating it upstream.
    Jsonp { callback: String },
}

impl Format {
    /// Resolve the format from decoded query parameters.
    ///
    /// A missing `callback` with `f=jsonp` yields an empty callback name.
    ///
    /// # Examples
    /// ```
    /// use media_backend::inbound::http::query::QueryParams;
    /// use media_backend::inbound::http::subsonic::Format;
    ///
    /// let params = QueryParams::parse("f=jsonp&callback=cb");
    /// assert_eq!(
    ///     Format::negotiate(&params),
    ///     Format::Jsonp { callback: "cb".to_owned() }
    /// );
    /// ```
    #[must_use]
    pub fn negotiate(params: &QueryParams) -> Self {
        match params.str_param(FORMAT_PARAM) {
            Some("json") => Self::Json,
            Some("jsonp") => Self::Jsonp {
                callback: params.str_param(CALLBACK_PARAM).unwrap_or_default().to_owned(),
            },
            _ => Self::Xml,
        }
    }

    /// Content type announced for this format.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Xml => "application/xml",
            Self::Json => "application/json",
            Self::Jsonp { .. } => "application/javascript",
        }
    }

    /// Short label used in log events.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Jsonp { .. } => "jsonp",
        }
    }
}

impl FromRequest for Format {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::negotiate(&QueryParams::parse(req.query_string()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    #[case("", Format::Xml)]
    #[case("f=xml", Format::Xml)]
    #[case("f=yaml", Format::Xml)]
    #[case("f=JSON", Format::Xml)]
    #[case("f=json", Format::Json)]
    #[case("f=jsonp&callback=cb", Format::Jsonp { callback: "cb".to_owned() })]
    #[case("f=jsonp", Format::Jsonp { callback: String::new() })]
    #[case("f=jsonp&callback=a%3Bb", Format::Jsonp { callback: "a;b".to_owned() })]
    fn negotiates_from_query(#[case] query: &str, #[case] expected: Format) {
        assert_eq!(Format::negotiate(&QueryParams::parse(query)), expected);
    }

    #[rstest]
    #[case(Format::Xml, "application/xml")]
    #[case(Format::Json, "application/json")]
    #[case(Format::Jsonp { callback: "cb".to_owned() }, "application/javascript")]
    fn content_type_matches_format(#[case] format: Format, #[case] content_type: &str) {
        assert_eq!(format.content_type(), content_type);
    }

    #[actix_web::test]
    async fn extracts_from_request() {
        let req = TestRequest::get()
            .uri("/rest/ping.view?u=admin&f=json")
            .to_http_request();
        let format = Format::extract(&req).await.expect("infallible extractor");
        assert_eq!(format, Format::Json);
    }
}
