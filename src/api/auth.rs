use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const API_TOKEN_ENV: &str = "RECON_API_TOKEN";

#[derive(Debug, PartialEq, Eq)]
enum AuthCheck {
    Open,
    Allowed,
    Missing,
    Mismatch,
}

fn check(expected: Option<&str>, headers: &HeaderMap) -> AuthCheck {
    let Some(expected) = expected.filter(|t| !t.is_empty()) else {
        return AuthCheck::Open;
    };
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim);

    match presented {
        None => AuthCheck::Missing,
        Some(token) if token == expected => AuthCheck::Allowed,
        Some(_) => AuthCheck::Mismatch,
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}

/// Bearer-token guard. Routes stay open unless `RECON_API_TOKEN` is set.
pub async fn api_auth_middleware(request: Request, next: Next) -> Response {
    let expected = std::env::var(API_TOKEN_ENV).ok();
    match check(expected.as_deref(), request.headers()) {
        AuthCheck::Open | AuthCheck::Allowed => next.run(request).await,
        AuthCheck::Missing => unauthorized("Missing Authorization header"),
        AuthCheck::Mismatch => unauthorized("Invalid API token"),
    }
}
