use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::errors::ReconError;

impl IntoResponse for ReconError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            ReconError::Config(_) => StatusCode::BAD_REQUEST,
            ReconError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            ReconError::Json(_) => StatusCode::BAD_REQUEST,
            ReconError::Authentication(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}

pub fn not_found(what: &str) -> axum::response::Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": format!("{} not found", what)}))).into_response()
}
