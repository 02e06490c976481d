//! Request/response logging.
//!
//! Runs inside `AuthContext`, so the caller identity (when a valid token
//! was presented) is already in the request extensions and gets logged.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::time::Instant;
use tracing::{info, warn};

use crate::middleware::AuthenticatedUser;

pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestLoggerService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestLoggerService {
            service: Rc::new(service),
        })
    }
}

pub struct RequestLoggerService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerService<S>
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
        let method = req.method().to_string();
        let path = req.path().to_string();
        let user_id = req
            .extensions()
            .get::<AuthenticatedUser>()
            .map(|user| user.id);
        let start = Instant::now();

        Box::pin(async move {
            let result = service.call(req).await;
            let duration = start.elapsed();

            match &result {
                Ok(res) => {
                    let status = res.status().as_u16();
                    if status >= 400 {
                        warn!(
                            method = %method,
                            path = %path,
                            status = status,
                            user_id = ?user_id,
                            duration_ms = duration.as_millis() as u64,
                            "request completed with error"
                        );
                    } else {
                        info!(
                            method = %method,
                            path = %path,
                            status = status,
                            user_id = ?user_id,
                            duration_ms = duration.as_millis() as u64,
                            "request completed"
                        );
                    }
                }
                Err(e) => {
                    warn!(
                        method = %method,
                        path = %path,
                        error = %e,
                        duration_ms = duration.as_millis() as u64,
                        "request failed"
                    );
                }
            }

            result
        })
    }
}
