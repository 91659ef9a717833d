//! Handlers for a coordinator's worker sub-resource.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::domain::errors::GatewayResult;
use crate::domain::requests::WorkerRequest;
use crate::http::state::AppState;

pub async fn spawn(
    State(state): State<AppState>,
    Path(coordinator): Path<String>,
    Json(req): Json<WorkerRequest>,
) -> GatewayResult<impl IntoResponse> {
    let (record, worker_username) = state.swarm.spawn(&coordinator, &req).await?;
    Ok(Json(json!({
        "status": "spawning",
        "worker_username": worker_username,
        "workload_name": record.workload_name,
        "task": req.task,
        "ttl_seconds": req.ttl_seconds,
    })))
}

pub async fn list(State(state): State<AppState>, Path(coordinator): Path<String>) -> GatewayResult<impl IntoResponse> {
    let workers = state.swarm.list(&coordinator).await?;
    let body: Vec<_> = workers
        .into_iter()
        .map(|(worker_username, worker, status)| {
            json!({
                "worker_username": worker_username,
                "task": worker.task,
                "persona": worker.persona,
                "spawned_at": worker.spawned_at,
                "ttl_seconds": worker.ttl_seconds,
                "status": status,
            })
        })
        .collect();
    Ok(Json(json!({ "coordinator": coordinator, "count": body.len(), "workers": body })))
}

pub async fn terminate(
    State(state): State<AppState>,
    Path((coordinator, worker_id)): Path<(String, String)>,
) -> GatewayResult<impl IntoResponse> {
    let worker_username = state.swarm.terminate(&coordinator, &worker_id).await?;
    Ok(Json(json!({ "status": "terminated", "worker": worker_username })))
}
