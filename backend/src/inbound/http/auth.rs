//! Bearer-token gate for protected routes.
//!
//! [`VerifyJwt`] is attached per route (`#[post("/x", wrap = "VerifyJwt")]`).
//! It reads the `Authorization` header, verifies the token through the
//! [`TokenService`](crate::domain::ports::TokenService) held in
//! [`HttpState`], and stores the decoded [`TokenClaims`] in the request
//! extensions. Handlers read them through the [`AuthenticatedUser`]
//! extractor. Every rejection produces the same 401 body so clients cannot
//! tell a missing header from a bad signature.

use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, error};

use crate::domain::{Error, TokenClaims};

use super::state::HttpState;

/// Message returned for every rejected request.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access!";

const BEARER_SCHEME: &str = "Bearer";

/// Extract the raw token from an `Authorization` header value.
///
/// The value must be exactly `<scheme> <token>` with a case-insensitive
/// `Bearer` scheme.
fn bearer_token(value: &str) -> Option<&str> {
    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    Some(token)
}

fn authorise(req: &ServiceRequest) -> Result<TokenClaims, Error> {
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        error!("token gate mounted without HttpState");
        return Err(Error::internal("authentication is not configured"));
    };
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized(UNAUTHORIZED_MESSAGE))?;
    let token = header
        .to_str()
        .ok()
        .and_then(bearer_token)
        .ok_or_else(|| Error::unauthorized(UNAUTHORIZED_MESSAGE))?;
    state.tokens.verify(token).map_err(|err| {
        debug!(error = %err, "bearer token rejected");
        Error::unauthorized(UNAUTHORIZED_MESSAGE)
    })
}

/// Route middleware requiring a valid bearer token.
#[derive(Clone, Copy, Default)]
pub struct VerifyJwt;

impl<S, B> Transform<S, ServiceRequest> for VerifyJwt
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = VerifyJwtMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(VerifyJwtMiddleware { service }))
    }
}

/// Service wrapper produced by [`VerifyJwt`].
pub struct VerifyJwtMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for VerifyJwtMiddleware<S>
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
        match authorise(&req) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                let res = req.error_response(err).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}

/// Claims of the caller, available on routes wrapped with [`VerifyJwt`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(TokenClaims);

impl AuthenticatedUser {
    pub fn email(&self) -> &str {
        self.0.email.as_str()
    }

    pub fn claims(&self) -> &TokenClaims {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<TokenClaims>()
                .cloned()
                .map(Self)
                .ok_or_else(|| Error::unauthorized(UNAUTHORIZED_MESSAGE)),
        )
    }
}
