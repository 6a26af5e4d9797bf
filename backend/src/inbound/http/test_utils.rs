//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::ports::{FIXTURE_ADMIN_ID, FIXTURE_MEMBER_ID};
use crate::domain::{Error, Principal, Role, UserId};
use crate::inbound::http::session::SessionContext;

/// Path of the test-only sign-in route registered by [`sign_in_route`].
pub const SIGN_IN_PATH: &str = "/test/sign-in/{role}";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Fixture principal for `role`, using the fixture account ids.
pub fn fixture_principal(role: Role) -> Principal {
    let raw = match role {
        Role::Admin => FIXTURE_ADMIN_ID,
        Role::Member => FIXTURE_MEMBER_ID,
    };
    Principal::new(UserId::new(raw).expect("fixture id"), role)
}

async fn sign_in(session: SessionContext, role: web::Path<String>) -> Result<HttpResponse, Error> {
    let role: Role = role
        .parse()
        .map_err(|err| Error::invalid_request(format!("{err}")))?;
    session.persist_principal(&fixture_principal(role))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Route that signs the caller in as the role named in the path.
pub fn sign_in_route(cfg: &mut web::ServiceConfig) {
    cfg.route(SIGN_IN_PATH, web::post().to(sign_in));
}

/// Sign in through [`sign_in_route`] and return the session cookie.
pub async fn session_cookie<S>(app: &S, role: Role) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/test/sign-in/{role}"))
            .to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}
