use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::api::models::{EnqueueRequest, NavigateRequest};
use crate::api::AppState;
use crate::queue::{Admission, QueueSnapshot};

fn admission_response(admission: Admission) -> (StatusCode, Json<Admission>) {
    let status = if admission.is_queued() {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };
    (status, Json(admission))
}

pub async fn get_queue(State(state): State<AppState>) -> Json<QueueSnapshot> {
    Json(state.queue.snapshot())
}

pub async fn enqueue(
    State(state): State<AppState>,
    Json(req): Json<EnqueueRequest>,
) -> (StatusCode, Json<Admission>) {
    admission_response(state.queue.enqueue(&req.domain))
}

pub async fn navigate(
    State(state): State<AppState>,
    Json(req): Json<NavigateRequest>,
) -> (StatusCode, Json<Admission>) {
    admission_response(state.queue.on_navigation(&req.url))
}

pub async fn skip_current(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "skipped": state.queue.skip_current() }))
}

pub async fn cancel_all(State(state): State<AppState>) -> Json<Value> {
    let cleared = state.queue.cancel_all();
    Json(json!({ "cleared": cleared }))
}
