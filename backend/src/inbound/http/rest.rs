//! Subsonic REST handlers served by the core itself.
//!
//! ```text
//! GET /rest/ping.view?f=json
//! GET /rest/getLicense.view?f=jsonp&callback=cb
//! ```

use actix_web::get;
use serde_json::json;
use tracing::error;

use crate::domain::{ApiOutcome, Payload, codes};
use crate::inbound::http::subsonic::{Format, SubsonicReply};

/// Liveness check for Subsonic clients; answers an empty success envelope.
#[get("/ping.view")]
pub async fn ping(format: Format) -> SubsonicReply {
    SubsonicReply::new(ApiOutcome::ok(), format)
}

/// Report the server licence. This server is always licensed.
#[get("/getLicense.view")]
pub async fn get_license(format: Format) -> SubsonicReply {
    let outcome = match Payload::new().with("license", json!({ "valid": true })) {
        Ok(payload) => ApiOutcome::success(payload),
        Err(err) => {
            error!(error = %err, "failed to build licence payload");
            ApiOutcome::error(codes::GENERIC, "internal error")
        }
    };
    SubsonicReply::new(outcome, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};
    use serde_json::Value;

    #[actix_web::test]
    async fn ping_answers_empty_success() {
        let app = test::init_service(App::new().service(web::scope("/rest").service(ping))).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/rest/ping.view?f=json")
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({ "subsonic-response": { "status": "ok", "version": "1.9.0" } })
        );
    }

    #[actix_web::test]
    async fn licence_is_valid_in_xml_by_default() {
        let app =
            test::init_service(App::new().service(web::scope("/rest").service(get_license)))
                .await;
        let body = test::call_and_read_body(
            &app,
            test::TestRequest::get()
                .uri("/rest/getLicense.view")
                .to_request(),
        )
        .await;
        assert_eq!(
            std::str::from_utf8(&body).expect("utf8"),
            concat!(
                r#"<subsonic-response status="ok" version="1.9.0" xmlns="http://subsonic.org/restapi">"#,
                r#"<license valid="true"/>"#,
                "</subsonic-response>"
            )
        );
    }
}
