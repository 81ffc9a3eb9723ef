//! Authorization gate for protected routes.
//!
//! [`RequireIdentity`] resolves the raw `Authorization` header through the
//! [`IdentityResolver`](crate::domain::ports::IdentityResolver) port before a
//! protected handler runs. On success the resolved [`User`] is stored in the
//! request extensions; otherwise the request is answered with `401` and the
//! handler never executes. The gate performs no writes.
//!
//! Handlers read the identity with the [`CurrentUser`] extractor, which fails
//! closed when the gate was not applied.
//!
//! ```ignore
//! #[post("/items/{item_id}/reviews", wrap = "RequireIdentity")]
//! async fn create_review(user: CurrentUser) -> ApiResult<HttpResponse> { ... }
//! ```

use std::future::{Ready, ready};
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error};

use crate::domain::{Error, User, UserId};

use super::state::HttpState;

/// Middleware factory guarding a route with bearer-token resolution.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequireIdentity;

impl<S, B> Transform<S, ServiceRequest> for RequireIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireIdentityMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service wrapper produced by [`RequireIdentity`].
pub struct RequireIdentityMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let user = match resolve_identity(&req).await {
                Ok(user) => user,
                Err(error) => return Ok(req.error_response(error).map_into_right_body()),
            };
            debug!(user_id = %user.id(), "request authorised");
            req.extensions_mut().insert(user);
            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

async fn resolve_identity(req: &ServiceRequest) -> Result<User, Error> {
    let Some(state) = req.app_data::<web::Data<HttpState>>().cloned() else {
        error!("identity gate mounted without HttpState");
        return Err(Error::internal("identity gate is not configured"));
    };
    let token = bearer_value(req.request())?;
    state.identity.resolve(&token).await
}

/// Raw `Authorization` value. The whole value is the token; no scheme prefix
/// is stripped.
fn bearer_value(req: &HttpRequest) -> Result<String, Error> {
    let value = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing authorization header"))?;
    let token = value
        .to_str()
        .map_err(|_| Error::unauthorized("invalid token"))?;
    if token.is_empty() {
        return Err(Error::unauthorized("missing authorization header"));
    }
    Ok(token.to_owned())
}

/// Identity attached by [`RequireIdentity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> &UserId {
        self.0.id()
    }

    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<User>().cloned();
        ready(
            user.map(CurrentUser)
                .ok_or_else(|| Error::unauthorized("login required")),
        )
    }
}
