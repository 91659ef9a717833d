//! Handlers for the platform-wide plan task ledger.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::domain::errors::GatewayResult;
use crate::domain::requests::{PatchPlanTaskRequest, PlanTaskFilter};
use crate::http::state::AppState;

pub async fn list(State(state): State<AppState>, Query(filter): Query<PlanTaskFilter>) -> GatewayResult<impl IntoResponse> {
    let tasks = state.plan_tracker.list(&filter).await?;
    Ok(Json(json!({ "count": tasks.len(), "tasks": tasks })))
}

pub async fn patch(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(req): Json<PatchPlanTaskRequest>,
) -> GatewayResult<impl IntoResponse> {
    req.validate()?;
    state
        .plan_tracker
        .patch(&task_id, req.status.as_deref(), req.notes.as_deref())
        .await?;
    Ok(Json(json!({ "status": "updated", "task_id": task_id })))
}
