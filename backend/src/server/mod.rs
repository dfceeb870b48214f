//! Server construction and middleware wiring.

mod config;

pub use config::{ServerConfig, ServerSettings};

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use media_backend::Trace;
use media_backend::inbound::http::pages;
use media_backend::inbound::http::rest::{get_license, ping};
use media_backend::inbound::http::state::PageState;
use media_backend::outbound::render::HtmlRenderer;

#[derive(Clone)]
struct AppDependencies {
    page_state: web::Data<PageState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        page_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let rest = web::scope("/rest").service(ping).service(get_license);

    let admin = web::scope("/admin")
        .wrap(session)
        .service(pages::login)
        .service(pages::home);

    App::new()
        .app_data(page_state)
        .wrap(Trace)
        .service(rest)
        .service(admin)
}

/// Bind the listener and start serving.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let page_state = web::Data::new(PageState::new(Arc::new(HtmlRenderer)));
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            page_state: page_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
