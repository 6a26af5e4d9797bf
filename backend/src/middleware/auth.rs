//! Route guard enforcing a signed-in session and, optionally, a role.
//!
//! The guard runs before any extractor on the wrapped route, so a request
//! that is not signed in gets `401` even when its body is malformed, and a
//! member hitting an admin route gets `403` before validation. On success
//! the resolved [`Principal`] is placed in the request extensions for the
//! [`Authenticated`](crate::inbound::http::session::Authenticated) extractor.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error as ActixError, HttpMessage, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{Error, Principal, Role};
use crate::inbound::http::session::SessionContext;

/// Middleware factory requiring a session with at least `role`.
///
/// # Examples
/// ```
/// use actix_web::{HttpResponse, web};
/// use portal_backend::middleware::RequireSession;
///
/// let route = web::post()
///     .to(|| async { HttpResponse::Created() })
///     .wrap(RequireSession::admin());
/// # let _ = route;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireSession {
    role: Role,
}

impl RequireSession {
    /// Any signed-in member.
    #[must_use]
    pub const fn authenticated() -> Self {
        Self { role: Role::Member }
    }

    /// Signed-in officers only.
    #[must_use]
    pub const fn admin() -> Self {
        Self { role: Role::Admin }
    }

    fn check(self, principal: Option<Principal>) -> Result<Principal, Error> {
        let principal = principal.ok_or_else(|| Error::unauthorized("login required"))?;
        if principal.satisfies(self.role) {
            Ok(principal)
        } else {
            Err(Error::forbidden(format!("{} role required", self.role)))
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service: Rc::new(service),
            guard: *self,
        }))
    }
}

/// Service wrapper produced by [`RequireSession`].
pub struct RequireSessionMiddleware<S> {
    service: Rc<S>,
    guard: RequireSession,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let session = SessionContext::new(req.get_session());
        let outcome = session
            .principal()
            .and_then(|principal| self.guard.check(principal));

        match outcome {
            Ok(principal) => {
                req.extensions_mut().insert(principal);
                let service = Rc::clone(&self.service);
                Box::pin(async move {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(error) => {
                debug!(code = ?error.code(), path = %req.path(), "request rejected by session guard");
                let response = error.error_response();
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}
