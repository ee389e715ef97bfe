#![allow(dead_code)]

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{body::MessageBody, test, web};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use serde_json::json;
use tasktrack::auth::AccessToken;
use tasktrack::config::AuthSettings;
use tasktrack::models::AccountResponse;
use tasktrack::AppState;

pub const PASSWORD: &str = "Password123!";

pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        secret: b"integration-test-secret".to_vec(),
        algorithm: Algorithm::HS256,
        token_ttl: Duration::minutes(30),
        bcrypt_cost: 4,
    }
}

pub fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::in_memory(&auth_settings()).expect("state should build"))
}

/// Auth details for an account created through the API.
pub struct TestUser {
    pub id: i32,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

pub async fn register_and_login<S, B>(app: &S, email: &str) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(
        resp.status(),
        actix_web::http::StatusCode::CREATED,
        "registration of {} failed",
        email
    );
    let account: AccountResponse = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(
        resp.status(),
        actix_web::http::StatusCode::OK,
        "login of {} failed",
        email
    );
    let token: AccessToken = test::read_body_json(resp).await;

    TestUser {
        id: account.id,
        token: token.access_token,
    }
}
