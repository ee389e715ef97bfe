use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use super::AuthError;
use crate::error::AppError;
use crate::models::Account;

/// The account resolved for this request by `AuthMiddleware`.
///
/// Only usable on routes inside a scope wrapped by the middleware. Anywhere
/// else the account is absent and extraction fails with the same generic
/// 401 as a bad token.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl FromRequest for CurrentAccount {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Account>().cloned() {
            Some(account) => ready(Ok(CurrentAccount(account))),
            None => {
                log::error!("No authenticated account on {}; is AuthMiddleware applied?", req.path());
                let err = AppError::from(AuthError::InvalidCredentials);
                ready(Err(err.into()))
            }
        }
    }
}
