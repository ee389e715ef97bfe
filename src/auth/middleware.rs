use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use chrono::Utc;
use futures::future::{ready, LocalBoxFuture, Ready};
use lazy_static::lazy_static;
use regex::Regex;
use std::rc::Rc;

use super::{guard, AuthError};
use crate::error::AppError;
use crate::state::AppState;

lazy_static! {
    // RFC 6750 credentials: case-insensitive scheme, then a b64token.
    static ref BEARER_RE: Regex =
        Regex::new(r"^(?i:bearer) +([A-Za-z0-9\-._~+/]+=*)$").unwrap();
}

/// Pulls the token out of an `Authorization` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    BEARER_RE
        .captures(header_value.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Authenticates every request of the scope it wraps.
///
/// On success the resolved [`Account`](crate::models::Account) is placed in
/// the request extensions for [`CurrentAccount`](super::CurrentAccount).
/// On failure the request is answered with the error response directly.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let state = match req.app_data::<web::Data<AppState>>() {
                Some(state) => state.clone(),
                None => {
                    let err = AppError::InternalServerError("Application state missing".into());
                    return Ok(req.error_response(err).map_into_right_body());
                }
            };

            let token = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(bearer_token)
                .map(str::to_owned);

            let outcome = match token {
                Some(token) => {
                    guard::authenticate(state.accounts.as_ref(), &state.codec, &token, Utc::now())
                        .await
                }
                None => Err(AuthError::InvalidCredentials.into()),
            };

            match outcome {
                Ok(account) => {
                    req.extensions_mut().insert(account);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}
