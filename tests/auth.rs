mod common;

use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, App};
use pretty_assertions::assert_eq;
use serde_json::json;
use tasktrack::auth::AccessToken;
use tasktrack::models::AccountResponse;
use tasktrack::routes;

use common::{register_and_login, test_state, PASSWORD};

#[test_log::test(actix_rt::test)]
async fn test_register_and_login_flow() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;

    let register_payload = json!({
        "email": "integration@example.com",
        "password": PASSWORD
    });
    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(&register_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "integration@example.com");
    assert!(body["id"].is_i64());
    assert!(body["created_at"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    // Same email again
    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(&register_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Email already registered");

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "integration@example.com", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login: AccessToken = test::read_body_json(resp).await;
    assert_eq!(login.token_type, "bearer");
    assert!(!login.access_token.is_empty());

    // The token works on a protected route.
    let req = test::TestRequest::get()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", login.access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_public_profile_lookup() {
    let app = test::init_service(App::new().app_data(test_state()).configure(routes::config)).await;
    let user = register_and_login(&app, "profile@example.com").await;

    let req = test::TestRequest::get()
        .uri(&format!("/users/{}", user.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let profile: AccountResponse = test::read_body_json(resp).await;
    assert_eq!(profile.id, user.id);
    assert_eq!(profile.email, "profile@example.com");

    let req = test::TestRequest::get()
        .uri(&format!("/users/{}", user.id + 100))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let app = test::init_service(App::new().app_data(test_state()).configure(routes::config)).await;

    let test_cases = vec![
        // Deserialization errors (400 for missing fields)
        (
            json!({ "password": PASSWORD }),
            StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "email": "test@example.com" }),
            StatusCode::BAD_REQUEST,
            "missing password",
        ),
        // Validation errors (422 after successful deserialization)
        (
            json!({ "email": "invalid-email", "password": PASSWORD }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        (
            json!({ "email": "test@example.com", "password": "123" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "password too short",
        ),
        (
            json!({ "email": "test@example.com", "password": "x".repeat(73) }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "password too long",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Body: {:?}",
            description,
            String::from_utf8_lossy(&body_bytes)
        );
    }
}

#[actix_rt::test]
async fn test_login_failures_are_indistinguishable() {
    let app = test::init_service(App::new().app_data(test_state()).configure(routes::config)).await;
    register_and_login(&app, "known@example.com").await;

    let attempts = [
        json!({ "email": "known@example.com", "password": "WrongPassword123!" }),
        json!({ "email": "nobody@example.com", "password": PASSWORD }),
    ];

    let mut observed = Vec::new();
    for payload in attempts {
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let www_authenticate = resp
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = test::read_body(resp).await;
        observed.push((status, www_authenticate, body));
    }

    assert_eq!(observed[0].0, StatusCode::UNAUTHORIZED);
    assert_eq!(observed[0].1.as_deref(), Some("Bearer"));
    assert_eq!(observed[0], observed[1]);
    assert_eq!(
        observed[0].2,
        r#"{"error":"Could not validate credentials"}"#.as_bytes()
    );
}

#[actix_rt::test]
async fn test_invalid_login_inputs() {
    let app = test::init_service(App::new().app_data(test_state()).configure(routes::config)).await;

    let test_cases = vec![
        (json!({ "password": PASSWORD }), StatusCode::BAD_REQUEST, "missing email"),
        (
            json!({ "email": "someone@example.com" }),
            StatusCode::BAD_REQUEST,
            "missing password",
        ),
        (
            json!({ "email": "", "password": PASSWORD }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "empty email",
        ),
        (
            json!({ "email": "someone@example.com", "password": "" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "empty password",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected_status, "Test case failed: {}", description);
    }
}

#[actix_rt::test]
async fn test_token_for_deleted_account_is_rejected() {
    let state = test_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;
    let user = register_and_login(&app, "short-lived@example.com").await;

    assert!(state.accounts.delete_account(user.id).await.unwrap());

    let req = test::TestRequest::get()
        .uri("/tasks")
        .append_header(user.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = test::read_body(resp).await;
    assert_eq!(body, r#"{"error":"Could not validate credentials"}"#.as_bytes());
}

#[actix_rt::test]
async fn test_protected_routes_reject_bad_credentials() {
    let state = test_state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(routes::config)).await;
    let user = register_and_login(&app, "holder@example.com").await;

    let expired = state
        .codec
        .issue(user.id, chrono::Utc::now() - state.codec.ttl() - chrono::Duration::minutes(1))
        .unwrap();

    let headers: Vec<Option<String>> = vec![
        None,
        Some("Bearer".to_string()),
        Some("Bearer not-a-jwt".to_string()),
        Some(format!("Basic {}", user.token)),
        Some(format!("Bearer {}x", user.token)),
        Some(format!("Bearer {}", expired)),
    ];

    for value in headers {
        let mut req = test::TestRequest::get().uri("/tasks");
        if let Some(value) = &value {
            req = req.append_header((header::AUTHORIZATION, value.as_str()));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "header {:?} should be rejected",
            value
        );
        assert_eq!(
            resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}

#[actix_rt::test]
async fn test_login_rejects_longer_password_with_matching_prefix() {
    let app = test::init_service(App::new().app_data(test_state()).configure(routes::config)).await;
    let password = "q".repeat(72);

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": "maxlen@example.com", "password": password }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "maxlen@example.com", "password": password }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "maxlen@example.com", "password": format!("{}EXTRA", password) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = test::read_body(resp).await;
    assert_eq!(body, r#"{"error":"Could not validate credentials"}"#.as_bytes());
}
