use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Welcome message.
#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "Hello, World!" }))
}

/// Liveness probe. Touches neither the store nor the auth core.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "timestamp": Utc::now()
    }))
}
