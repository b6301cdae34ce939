use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::api::errors::not_found;
use crate::api::models::IgnoreRequest;
use crate::api::AppState;
use crate::db::IgnoreStore;
use crate::errors::ReconError;

pub async fn list_ignored(State(state): State<AppState>) -> Result<Json<Value>, ReconError> {
    let list = state.store.load_ignore_list()?;
    Ok(Json(json!({ "domains": list })))
}

pub async fn add_ignored(
    State(state): State<AppState>,
    Json(req): Json<IgnoreRequest>,
) -> Result<(StatusCode, Json<Value>), ReconError> {
    let root = state.store.add_ignored(&req.domain)?;
    Ok((StatusCode::CREATED, Json(json!({ "domain": root }))))
}

pub async fn remove_ignored(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Response, ReconError> {
    if state.store.remove_ignored(&domain)? {
        Ok(Json(json!({ "removed": domain })).into_response())
    } else {
        Ok(not_found(&format!("Ignored domain {}", domain)))
    }
}
