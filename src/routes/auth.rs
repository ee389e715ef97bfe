use crate::{
    auth::{self, LoginRequest},
    error::AppError,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use chrono::Utc;
use validator::Validate;

/// Login
///
/// Exchanges an email and password for a bearer token.
///
/// ## Responses:
/// - `200 OK`: `{"access_token": "...", "token_type": "bearer"}`.
/// - `401 Unauthorized`: Unknown email or wrong password; the body does not say which.
/// - `422 Unprocessable Entity`: Empty email or password.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let token = auth::login(
        state.accounts.as_ref(),
        &state.hasher,
        &state.codec,
        &login_data.email,
        &login_data.password,
        Utc::now(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(token))
}
