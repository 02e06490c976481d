//! Optional authentication context.
//!
//! Decodes a `Bearer` token when one is present and stores the caller's
//! identity in request extensions. It never rejects: routes stay open and
//! handlers that care (ticket intake) look the identity up themselves.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::models::Role;
use crate::security;

pub struct AuthContext {
    secret: Rc<String>,
}

impl AuthContext {
    pub fn new(secret: String) -> Self {
        Self {
            secret: Rc::new(secret),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthContext
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthContextService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthContextService {
            service: Rc::new(service),
            secret: Rc::clone(&self.secret),
        })
    }
}

pub struct AuthContextService<S> {
    service: Rc<S>,
    secret: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for AuthContextService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let secret = Rc::clone(&self.secret);

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "));

            if let Some(token) = token {
                // Invalid or expired tokens are simply ignored.
                if let Ok(claims) = security::decode_token(token, &secret) {
                    req.extensions_mut().insert(AuthenticatedUser {
                        id: claims.sub,
                        role: Role::parse(&claims.role),
                    });
                }
            }

            service.call(req).await
        })
    }
}

/// Caller identity stored in request extensions.
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub role: Role,
}
