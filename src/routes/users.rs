use crate::{
    error::AppError,
    models::{AccountResponse, RegisterRequest},
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new account
///
/// ## Responses:
/// - `201 Created`: The new account, without its password hash.
/// - `400 Bad Request`: The email is already registered.
/// - `422 Unprocessable Entity`: Invalid email or password length.
#[post("")]
pub async fn create_user(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    if state.accounts.find_by_email(&register_data.email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = state.hasher.hash(&register_data.password)?;
    let account = state
        .accounts
        .create_account(&register_data.email, &password_hash)
        .await?;

    log::info!("Registered account {}", account.id);
    Ok(HttpResponse::Created().json(AccountResponse::from(account)))
}

/// Public profile of an account.
#[get("/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    user_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let user_id = user_id.into_inner();

    match state.accounts.find_by_id(user_id).await? {
        Some(account) => Ok(HttpResponse::Ok().json(AccountResponse::from(account))),
        None => Err(AppError::NotFound(format!(
            "User with id: {} not found",
            user_id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthSettings;
    use actix_web::{http::StatusCode, test, App};
    use chrono::Duration;
    use jsonwebtoken::Algorithm;
    use serde_json::json;

    fn state() -> web::Data<AppState> {
        let settings = AuthSettings {
            secret: b"users-route-secret".to_vec(),
            algorithm: Algorithm::HS256,
            token_ttl: Duration::minutes(30),
            bcrypt_cost: 4,
        };
        web::Data::new(AppState::in_memory(&settings).unwrap())
    }

    #[actix_rt::test]
    async fn test_register_validation() {
        let app = test::init_service(
            App::new()
                .app_data(state())
                .service(web::scope("/users").service(create_user)),
        )
        .await;

        for payload in [
            json!({ "email": "invalid-email", "password": "password123" }),
            json!({ "email": "test@example.com", "password": "short" }),
        ] {
            let req = test::TestRequest::post()
                .uri("/users")
                .set_json(&payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[actix_rt::test]
    async fn test_unknown_user_is_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(state())
                .service(web::scope("/users").service(get_user)),
        )
        .await;

        let req = test::TestRequest::get().uri("/users/41").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "User with id: 41 not found");
    }
}
