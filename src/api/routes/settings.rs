use axum::{extract::State, Json};
use serde_json::Value;

use crate::api::models::SettingsView;
use crate::api::AppState;
use crate::db::SettingsStore;
use crate::errors::ReconError;

pub async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsView>, ReconError> {
    let settings = state.store.load_settings()?;
    Ok(Json(SettingsView::from(&settings)))
}

/// Partial update: only the keys present in the body change.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<SettingsView>, ReconError> {
    let current = state.store.load_settings()?;
    let updated = current.merged(&body)?;
    state.store.save_settings(&updated)?;
    tracing::info!(auto_scan = updated.auto_scan, "Settings updated");
    Ok(Json(SettingsView::from(&updated)))
}
