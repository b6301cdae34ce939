pub mod auth;
pub mod errors;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db::KeyValueStore;
use crate::queue::ScanQueue;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub queue: ScanQueue,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, queue: ScanQueue) -> Self {
        Self { store, queue }
    }
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/queue",
            get(routes::queue::get_queue)
                .post(routes::queue::enqueue)
                .delete(routes::queue::cancel_all),
        )
        .route("/api/queue/skip", post(routes::queue::skip_current))
        .route("/api/navigate", post(routes::queue::navigate))
        .route("/api/history", get(routes::history::list_history))
        .route(
            "/api/history/:domain",
            get(routes::history::get_history).delete(routes::history::delete_history),
        )
        .route(
            "/api/settings",
            get(routes::settings::get_settings).put(routes::settings::update_settings),
        )
        .route(
            "/api/ignore",
            get(routes::ignore::list_ignored).post(routes::ignore::add_ignored),
        )
        .route("/api/ignore/:domain", delete(routes::ignore::remove_ignored))
        .route_layer(middleware::from_fn(auth::api_auth_middleware));

    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
