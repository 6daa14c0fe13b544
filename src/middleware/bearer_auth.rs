/// Bearer Authentication Middleware
///
/// Guards a scope: validates the bearer token from the Authorization
/// header and injects the verified claims into request extensions for
/// route handlers.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{CredentialCheck, SessionAuthenticator};
use crate::error::{AppError, AuthError};

/// Token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Middleware for protecting routes
pub struct BearerAuth<C> {
    authenticator: web::Data<SessionAuthenticator<C>>,
}

impl<C> BearerAuth<C> {
    pub fn new(authenticator: web::Data<SessionAuthenticator<C>>) -> Self {
        Self { authenticator }
    }
}

impl<S, B, C> Transform<S, ServiceRequest> for BearerAuth<C>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    C: CredentialCheck + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthService<S, C>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(BearerAuthService {
            service: Rc::new(service),
            authenticator: self.authenticator.clone(),
        }))
    }
}

pub struct BearerAuthService<S, C> {
    service: Rc<S>,
    authenticator: web::Data<SessionAuthenticator<C>>,
}

impl<S, B, C> Service<ServiceRequest> for BearerAuthService<S, C>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    C: CredentialCheck + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_string);

        let Some(token) = token else {
            tracing::warn!(path = %req.path(), "Missing or invalid Authorization header");
            return Box::pin(async { Err(AppError::Auth(AuthError::MissingToken).into()) });
        };

        match self.authenticator.authenticate(&token) {
            Ok(claims) => {
                tracing::debug!(subject = %claims.sub, "Bearer token validated");
                req.extensions_mut().insert(claims);

                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => Box::pin(async move { Err(AppError::Auth(e).into()) }),
        }
    }
}
