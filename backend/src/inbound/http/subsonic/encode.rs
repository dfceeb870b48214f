//! Response encoding for the Subsonic API.
//!
//! Encoding is pure: an [`ApiOutcome`] plus a [`Format`] map to a content type
//! and body bytes. The HTTP status is always `200 OK`; failures the client
//! should see live inside the envelope.

use tracing::error;

use super::format::Format;
use super::xml;
use crate::domain::{ApiOutcome, Envelope};

/// Encoder-internal failure. Never an application error.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// JSON serialisation failed.
    #[error("could not marshal to json: {0}")]
    Json(#[from] serde_json::Error),
    /// The XML writer rejected an event.
    #[error("could not marshal to xml: {0}")]
    Xml(String),
    /// A payload key cannot be used as an XML element or attribute name.
    #[error("could not marshal to xml: `{0}` is not a valid XML name")]
    InvalidName(String),
    /// A payload key collides with an attribute the envelope writes itself.
    #[error("could not marshal to xml: `{0}` is reserved by the response envelope")]
    ReservedName(String),
}

/// Encoded response ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Translate an outcome into wire bytes, failing on serialisation errors.
///
/// # Examples
/// ```
/// use media_backend::domain::ApiOutcome;
/// use media_backend::inbound::http::subsonic::{try_encode, Format};
///
/// let encoded = try_encode(
///     &ApiOutcome::ok(),
///     &Format::Jsonp { callback: "cb".to_owned() },
/// )?;
/// assert_eq!(encoded.content_type, "application/javascript");
/// assert_eq!(
///     encoded.body,
///     br#"cb({"subsonic-response":{"status":"ok","version":"1.9.0"}});"#
/// );
/// # Ok::<(), media_backend::inbound::http::subsonic::EncodeError>(())
/// ```
pub fn try_encode(outcome: &ApiOutcome, format: &Format) -> Result<Encoded, EncodeError> {
    let envelope = outcome.to_envelope();
    let body = match format {
        Format::Xml => xml::to_vec(&envelope)?,
        Format::Json => to_json(&envelope)?,
        Format::Jsonp { callback } => jsonp_frame(callback, &to_json(&envelope)?),
    };
    Ok(Encoded {
        content_type: format.content_type(),
        body,
    })
}

/// Translate an outcome into wire bytes under the best-effort policy.
///
/// Serialisation failures are logged and the response goes out with an
/// empty envelope. JSONP keeps its framing around the empty envelope, so the
/// client still receives `callback();`. The content type is always set.
pub fn best_effort_encode(outcome: &ApiOutcome, format: &Format) -> Encoded {
    let envelope = outcome.to_envelope();
    let body = match format {
        Format::Xml => swallow(format, xml::to_vec(&envelope)),
        Format::Json => swallow(format, to_json(&envelope)),
        Format::Jsonp { callback } => jsonp_frame(callback, &swallow(format, to_json(&envelope))),
    };
    Encoded {
        content_type: format.content_type(),
        body,
    }
}

fn to_json(envelope: &Envelope) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(envelope)?)
}

fn jsonp_frame(callback: &str, json: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(callback.len() + json.len() + 3);
    body.extend_from_slice(callback.as_bytes());
    body.push(b'(');
    body.extend_from_slice(json);
    body.extend_from_slice(b");");
    body
}

fn swallow(format: &Format, result: Result<Vec<u8>, EncodeError>) -> Vec<u8> {
    result.unwrap_or_else(|err| {
        error!(
            format = format.label(),
            error = %err,
            "response encoding failed; sending empty body"
        );
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{API_VERSION, Payload, codes};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn license_outcome() -> ApiOutcome {
        let payload = Payload::new()
            .with(
                "license",
                json!({ "valid": true, "email": "admin@example.com" }),
            )
            .expect("valid key");
        ApiOutcome::success(payload)
    }

    fn invalid_xml_outcome() -> ApiOutcome {
        let payload = Payload::new()
            .with("not a name", json!({ "x": 1 }))
            .expect("not reserved");
        ApiOutcome::success(payload)
    }

    #[rstest]
    fn json_success_has_no_error_field_and_exact_payload(license_outcome: ApiOutcome) {
        let encoded = try_encode(&license_outcome, &Format::Json).expect("json encodes");
        assert_eq!(encoded.content_type, "application/json");

        let value: Value = serde_json::from_slice(&encoded.body).expect("valid json");
        let response = value.get("subsonic-response").expect("envelope root");
        assert!(response.get("error").is_none());
        assert_eq!(response.get("status"), Some(&json!("ok")));
        assert_eq!(response.get("version"), Some(&json!(API_VERSION)));
        assert_eq!(
            response.get("license"),
            Some(&json!({ "valid": true, "email": "admin@example.com" }))
        );
    }

    #[rstest]
    fn xml_success_mirrors_json_structure(license_outcome: ApiOutcome) {
        let encoded = try_encode(&license_outcome, &Format::Xml).expect("xml encodes");
        assert_eq!(encoded.content_type, "application/xml");
        assert_eq!(
            String::from_utf8(encoded.body).expect("utf8"),
            concat!(
                r#"<subsonic-response status="ok" version="1.9.0" xmlns="http://subsonic.org/restapi">"#,
                r#"<license valid="true" email="admin@example.com"/>"#,
                "</subsonic-response>"
            )
        );
    }

    #[rstest]
    fn json_error_round_trips() {
        let outcome = ApiOutcome::error(codes::NOT_AUTHORISED, "user is not an admin");
        let encoded = try_encode(&outcome, &Format::Json).expect("json encodes");
        let decoded: Envelope = serde_json::from_slice(&encoded.body).expect("decodes");
        assert_eq!(decoded.into_outcome(), outcome);
    }

    #[rstest]
    #[case(Format::Xml)]
    #[case(Format::Json)]
    #[case(Format::Jsonp { callback: "cb".to_owned() })]
    fn every_format_carries_error_code_and_message(#[case] format: Format) {
        let outcome = ApiOutcome::error(codes::NOT_FOUND, "album not found");
        let body = String::from_utf8(try_encode(&outcome, &format).expect("encodes").body)
            .expect("utf8");
        assert!(body.contains("70"), "{body}");
        assert!(body.contains("album not found"), "{body}");
    }

    #[rstest]
    fn jsonp_framing_is_byte_exact() {
        let payload = Payload::new().with("x", json!(1)).expect("valid key");
        let encoded = try_encode(
            &ApiOutcome::success(payload),
            &Format::Jsonp {
                callback: "cb".to_owned(),
            },
        )
        .expect("jsonp encodes");
        assert_eq!(
            String::from_utf8(encoded.body).expect("utf8"),
            r#"cb({"subsonic-response":{"status":"ok","version":"1.9.0","x":1}});"#
        );
    }

    #[rstest]
    fn jsonp_callback_is_used_verbatim() {
        let encoded = best_effort_encode(
            &ApiOutcome::ok(),
            &Format::Jsonp {
                callback: "alert(1)//".to_owned(),
            },
        );
        assert!(encoded.body.starts_with(b"alert(1)//({"));
    }

    #[rstest]
    fn strict_encoding_surfaces_xml_failures() {
        let err = try_encode(&invalid_xml_outcome(), &Format::Xml).expect_err("invalid name");
        assert!(matches!(err, EncodeError::InvalidName(_)));
    }

    // Legacy behaviour: encoder failures are logged and an empty body is sent
    // instead of escalating to an error status.
    #[rstest]
    fn best_effort_swallows_xml_failures() {
        let encoded = best_effort_encode(&invalid_xml_outcome(), &Format::Xml);
        assert_eq!(encoded.content_type, "application/xml");
        assert!(encoded.body.is_empty());
    }

    #[rstest]
    fn swallowed_jsonp_failure_keeps_framing() {
        let json = swallow(
            &Format::Json,
            Err(EncodeError::Xml("simulated failure".to_owned())),
        );
        assert_eq!(jsonp_frame("cb", &json), b"cb();");
    }

    #[rstest]
    fn json_accepts_keys_that_xml_rejects() {
        // The JSON encoder accepts any key; only XML enforces names.
        let encoded = try_encode(&invalid_xml_outcome(), &Format::Json).expect("json accepts");
        let value: Value = serde_json::from_slice(&encoded.body).expect("valid json");
        assert!(value["subsonic-response"].get("not a name").is_some());
    }
}
