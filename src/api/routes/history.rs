use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::errors::not_found;
use crate::api::models::HistoryQuery;
use crate::api::AppState;
use crate::db::HistoryStore;
use crate::errors::ReconError;
use crate::utils::get_root_domain;

fn root_of(input: &str) -> Result<String, ReconError> {
    get_root_domain(input).ok_or_else(|| ReconError::InvalidTarget(format!("'{}' is not a domain", input)))
}

pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, ReconError> {
    let mut items = state.store.load_history()?;
    if let Some(limit) = query.limit {
        items.truncate(limit);
    }
    Ok(Json(json!({ "total": items.len(), "items": items })).into_response())
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Response, ReconError> {
    let root = root_of(&domain)?;
    match state.store.history_for(&root)? {
        Some(item) => Ok(Json(item).into_response()),
        None => Ok(not_found(&format!("History for {}", root))),
    }
}

pub async fn delete_history(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Response, ReconError> {
    let root = root_of(&domain)?;
    if state.store.remove_history(&root)? {
        Ok(Json(json!({ "removed": root })).into_response())
    } else {
        Ok(not_found(&format!("History for {}", root)))
    }
}
