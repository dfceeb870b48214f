//! Query-string parameter helpers.
//!
//! ```text
//! GET /rest/getAlbumList.view?type=newest&size=20&f=json
//! ```

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::{SubsonicError, codes};

/// Failure to read an integer parameter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// The key is absent or has an empty value.
    #[error("no param with key `{key}`")]
    Missing { key: String },
    /// The value is not a base-10 integer.
    #[error("not an int `{value}`")]
    NotAnInt { key: String, value: String },
}

impl From<ParamError> for SubsonicError {
    fn from(error: ParamError) -> Self {
        let code = match error {
            ParamError::Missing { .. } => codes::MISSING_PARAMETER,
            ParamError::NotAnInt { .. } => codes::GENERIC,
        };
        Self {
            code,
            message: error.to_string(),
        }
    }
}

/// Decoded query parameters of a single request.
///
/// Lookups return the first value for a repeated key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Decode a raw `application/x-www-form-urlencoded` query string.
    ///
    /// # Examples
    /// ```
    /// use media_backend::inbound::http::query::QueryParams;
    ///
    /// let params = QueryParams::parse("size=7&f=json");
    /// assert_eq!(params.int_param_or("size", 10), 7);
    /// assert_eq!(params.str_param("f"), Some("json"));
    /// ```
    #[must_use]
    pub fn parse(query: &str) -> Self {
        Self(
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        )
    }

    /// Raw string value for `key`.
    #[must_use]
    pub fn str_param(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }

    /// Integer value for `key`; empty values count as missing.
    pub fn int_param(&self, key: &str) -> Result<i64, ParamError> {
        let raw = match self.str_param(key) {
            Some(value) if !value.is_empty() => value,
            _ => {
                return Err(ParamError::Missing {
                    key: key.to_owned(),
                });
            }
        };
        raw.parse().map_err(|_| ParamError::NotAnInt {
            key: key.to_owned(),
            value: raw.to_owned(),
        })
    }

    /// Integer value for `key`, or `default` when absent or malformed.
    #[must_use]
    pub fn int_param_or(&self, key: &str, default: i64) -> i64 {
        self.int_param(key).unwrap_or(default)
    }
}

impl FromRequest for QueryParams {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::parse(req.query_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 5)]
    #[case("size=", 5)]
    #[case("size=abc", 5)]
    #[case("size=7", 7)]
    #[case("size=-3", -3)]
    #[case("size=7&size=9", 7)]
    fn int_param_or_falls_back_to_default(#[case] query: &str, #[case] expected: i64) {
        assert_eq!(QueryParams::parse(query).int_param_or("size", 5), expected);
    }

    #[rstest]
    fn int_param_reports_missing_key() {
        let err = QueryParams::parse("f=json")
            .int_param("id")
            .expect_err("missing key");
        assert_eq!(
            err,
            ParamError::Missing {
                key: "id".to_owned()
            }
        );
        assert_eq!(err.to_string(), "no param with key `id`");
    }

    #[rstest]
    fn int_param_reports_non_integer_value() {
        let err = QueryParams::parse("id=1.5")
            .int_param("id")
            .expect_err("not an integer");
        assert_eq!(err.to_string(), "not an int `1.5`");
    }

    #[rstest]
    fn lookups_are_repeatable() {
        let params = QueryParams::parse("id=12&name=a%20b");
        assert_eq!(params.int_param("id"), Ok(12));
        assert_eq!(params.int_param("id"), Ok(12));
        assert_eq!(params.str_param("name"), Some("a b"));
        assert_eq!(params.str_param("missing"), None);
    }

    #[rstest]
    #[case(ParamError::Missing { key: "id".to_owned() }, codes::MISSING_PARAMETER)]
    #[case(
        ParamError::NotAnInt { key: "id".to_owned(), value: "x".to_owned() },
        codes::GENERIC
    )]
    fn param_errors_map_to_subsonic_codes(#[case] error: ParamError, #[case] code: u64) {
        let message = error.to_string();
        let converted = SubsonicError::from(error);
        assert_eq!(converted.code, code);
        assert_eq!(converted.message, message);
    }
}
