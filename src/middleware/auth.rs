use crate::{services::auth_service, utils::ApiError};
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

/// Request gate for the protected scopes. Extracts the bearer token,
/// verifies it and attaches the decoded `Claims` to the request
/// extensions; handlers read them with `web::ReqData<Claims>`.
///
/// Verification failure terminates the request with 403 right here; the
/// request never reaches a handler with an unverified identity.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS preflight carries no credentials
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await });
        }

        let header_str = match req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
        {
            Some(value) => value.to_string(),
            None => {
                return Box::pin(async move {
                    Err(ApiError::Unauthorized("You are not authorized.".to_string()).into())
                });
            }
        };

        // "Bearer <token>"
        let token = match header_str.split_whitespace().nth(1) {
            Some(token) => token.to_string(),
            None => {
                return Box::pin(async move {
                    Err(ApiError::Unauthorized(
                        "Please provide a token with your request.".to_string(),
                    )
                    .into())
                });
            }
        };

        match auth_service::verify_token(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await })
            }
            Err(e) => {
                log::warn!("⚠️ Rejected request with invalid token: {}", e);
                Box::pin(async move {
                    Err(ApiError::Unauthorized("Token not valid".to_string()).into())
                })
            }
        }
    }
}
