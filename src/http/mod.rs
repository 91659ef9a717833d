//! HTTP API Surface: routes every verb in the gateway's REST API onto
//! the Instance Orchestrator, Relay, Swarm Controller, and Plan
//! Tracker Store, via `AppState`.

pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/v1/agents/create", post(handlers::agents::create))
        .route("/api/v1/agents", get(handlers::agents::list))
        .route(
            "/api/v1/agents/{username}",
            get(handlers::agents::get).delete(handlers::agents::delete),
        )
        .route("/api/v1/agents/{username}/restart", post(handlers::agents::restart))
        .route("/api/v1/agents/{username}/config", patch(handlers::agents::patch))
        .route("/api/v1/agents/{username}/chat", post(handlers::agents::chat))
        .route("/api/v1/agents/{username}/project", post(handlers::agents::project))
        .route("/api/v1/agents/{username}/workspace", get(handlers::agents::workspace))
        .route("/api/v1/agents/{username}/tasks", get(handlers::agents::tasks))
        .route("/api/v1/agents/{username}/relay", post(handlers::agents::relay))
        .route(
            "/api/v1/agents/{coordinator}/workers",
            post(handlers::swarm::spawn).get(handlers::swarm::list),
        )
        .route("/api/v1/agents/{coordinator}/workers/{worker_id}", delete(handlers::swarm::terminate))
        .route("/api/v1/platform/tasks", get(handlers::platform::list))
        .route("/api/v1/platform/tasks/{task_id}", patch(handlers::platform::patch))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
