//! Subsonic API outcomes and the wire envelope wrapped around them.
//!
//! Handlers produce an [`ApiOutcome`]; the HTTP adapter turns it into an
//! [`Envelope`] and serialises that in the negotiated format. Business
//! failures travel inside the envelope, never as transport status codes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// API version advertised in every envelope.
pub const API_VERSION: &str = "1.9.0";

/// XML namespace attached to the XML rendering of the envelope.
pub const XMLNS: &str = "http://subsonic.org/restapi";

/// Subsonic error codes understood by clients.
pub mod codes {
    /// A generic error.
    pub const GENERIC: u64 = 0;
    /// Required parameter is missing.
    pub const MISSING_PARAMETER: u64 = 10;
    /// Incompatible REST protocol version; the client must upgrade.
    pub const CLIENT_TOO_OLD: u64 = 20;
    /// Incompatible REST protocol version; the server must upgrade.
    pub const SERVER_TOO_OLD: u64 = 30;
    /// Wrong username or password.
    pub const WRONG_CREDENTIALS: u64 = 40;
    /// Token authentication is not supported.
    pub const TOKEN_AUTH_UNSUPPORTED: u64 = 41;
    /// The user is not authorised for the given operation.
    pub const NOT_AUTHORISED: u64 = 50;
    /// The trial period for the server is over.
    pub const TRIAL_EXPIRED: u64 = 60;
    /// The requested data was not found.
    pub const NOT_FOUND: u64 = 70;
}

const RESERVED_KEYS: [&str; 4] = ["status", "version", "error", "xmlns"];

/// Raised when a payload field would shadow an envelope field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("payload key `{key}` is reserved by the response envelope")]
pub struct ReservedKey {
    key: String,
}

/// Structured success payload, flattened into the envelope.
///
/// # Examples
/// ```
/// use media_backend::domain::Payload;
/// use serde_json::json;
///
/// let payload = Payload::new().with("license", json!({ "valid": true }))?;
/// assert_eq!(payload.get("license"), Some(&json!({ "valid": true })));
/// # Ok::<(), media_backend::domain::ReservedKey>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Create an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, rejecting keys owned by the envelope.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<(), ReservedKey> {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(ReservedKey { key });
        }
        self.0.insert(key, value);
        Ok(())
    }

    /// Builder-style [`Payload::insert`].
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Result<Self, ReservedKey> {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Error branch of an [`ApiOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsonicError {
    /// Numeric code from [`codes`].
    pub code: u64,
    /// Human-readable description.
    pub message: String,
}

/// Result of a Subsonic API operation. Exactly one branch is populated.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    /// The operation succeeded with the given payload.
    Success(Payload),
    /// The operation failed at the application level.
    Failure(SubsonicError),
}

impl ApiOutcome {
    /// Success without a payload, as answered by `ping`.
    #[must_use]
    pub fn ok() -> Self {
        Self::Success(Payload::new())
    }

    /// Success carrying `payload`.
    #[must_use]
    pub fn success(payload: Payload) -> Self {
        Self::Success(payload)
    }

    /// Build the error branch from a code and message.
    ///
    /// # Examples
    /// ```
    /// use media_backend::domain::{codes, ApiOutcome};
    ///
    /// let outcome = ApiOutcome::error(codes::NOT_FOUND, "album not found");
    /// assert!(matches!(outcome, ApiOutcome::Failure(ref err) if err.code == 70));
    /// ```
    pub fn error(code: u64, message: impl Into<String>) -> Self {
        Self::Failure(SubsonicError {
            code,
            message: message.into(),
        })
    }

    /// Wrap the outcome in the wire envelope.
    #[must_use]
    pub fn to_envelope(&self) -> Envelope {
        let response = match self {
            Self::Success(payload) => Response {
                status: Status::Ok,
                version: API_VERSION.to_owned(),
                error: None,
                payload: payload.clone(),
            },
            Self::Failure(error) => Response {
                status: Status::Failed,
                version: API_VERSION.to_owned(),
                error: Some(error.clone()),
                payload: Payload::new(),
            },
        };
        Envelope { response }
    }
}

impl From<SubsonicError> for ApiOutcome {
    fn from(error: SubsonicError) -> Self {
        Self::Failure(error)
    }
}

/// Envelope status attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Success.
    Ok,
    /// Application-level failure.
    Failed,
}

impl Status {
    /// Wire label of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Failed => "failed",
        }
    }
}

/// Body of the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SubsonicError>,
    #[serde(flatten)]
    pub payload: Payload,
}

/// Top-level wire object: `{"subsonic-response": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "subsonic-response")]
    pub response: Response,
}

impl Envelope {
    /// Recover the outcome carried by a decoded envelope.
    #[must_use]
    pub fn into_outcome(self) -> ApiOutcome {
        match self.response.error {
            Some(error) => ApiOutcome::Failure(error),
            None => ApiOutcome::Success(self.response.payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("status")]
    #[case("version")]
    #[case("error")]
    #[case("xmlns")]
    fn envelope_keys_are_reserved(#[case] key: &str) {
        let err = Payload::new()
            .with(key, json!(1))
            .expect_err("reserved key must be rejected");
        assert_eq!(
            err.to_string(),
            format!("payload key `{key}` is reserved by the response envelope")
        );
    }

    #[rstest]
    fn error_outcome_populates_only_the_error_branch() {
        let envelope = ApiOutcome::error(codes::WRONG_CREDENTIALS, "bad password").to_envelope();
        assert_eq!(envelope.response.status, Status::Failed);
        assert_eq!(envelope.response.payload, Payload::new());
        assert_eq!(
            envelope.response.error,
            Some(SubsonicError {
                code: 40,
                message: "bad password".to_owned(),
            })
        );
    }

    #[rstest]
    fn success_envelope_flattens_payload() {
        let payload = Payload::new()
            .with("license", json!({ "valid": true }))
            .expect("valid key");
        let value = serde_json::to_value(ApiOutcome::success(payload).to_envelope())
            .expect("envelope serialises");
        assert_eq!(
            value,
            json!({
                "subsonic-response": {
                    "status": "ok",
                    "version": API_VERSION,
                    "license": { "valid": true },
                }
            })
        );
    }

    #[rstest]
    fn decoded_envelope_recovers_the_outcome() {
        let outcome = ApiOutcome::error(codes::NOT_FOUND, "missing");
        let value = serde_json::to_value(outcome.to_envelope()).expect("serialises");
        let decoded: Envelope = serde_json::from_value(value).expect("deserialises");
        assert_eq!(decoded.into_outcome(), outcome);
    }
}
