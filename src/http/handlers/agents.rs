//! Handlers for `/api/v1/agents` and its per-tenant sub-resources:
//! lifecycle (create/list/get/delete/patch/restart), chat, project,
//! workspace, tasks, and relay.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::domain::errors::GatewayResult;
use crate::domain::requests::{
    ChatRequest, CreateAgentRequest, ProjectRequest, RelayRequest, TaskListFilter, UpdateConfigRequest,
};
use crate::http::state::AppState;

pub async fn create(State(state): State<AppState>, Json(req): Json<CreateAgentRequest>) -> GatewayResult<impl IntoResponse> {
    let record = state.orchestrator.create(&req).await?;
    let webchat_url = record.has_webchat.then(|| format!("/chat/{}", record.username));
    Ok(Json(json!({
        "status": "created",
        "username": record.username,
        "workload_name": record.workload_name,
        "webchat_url": webchat_url,
    })))
}

pub async fn list(State(state): State<AppState>) -> GatewayResult<impl IntoResponse> {
    let tenants = state.orchestrator.list().await?;
    let mut agents = Vec::with_capacity(tenants.len());
    for tenant in tenants {
        let live_status = state.orchestrator.live_status(&tenant.username).await.unwrap_or(tenant.status.clone());
        let mut entry = serde_json::to_value(&tenant)?;
        entry["status"] = json!(live_status);
        agents.push(entry);
    }
    Ok(Json(json!({
        "count": agents.len(),
        "max": state.settings.max_instances,
        "agents": agents,
    })))
}

pub async fn get(State(state): State<AppState>, Path(username): Path<String>) -> GatewayResult<impl IntoResponse> {
    let record = state.orchestrator.get(&username).await?;
    let pod = state
        .orchestrator
        .cluster()
        .read_workload_status(&crate::infrastructure::cluster::manifests::workload_name(&username))
        .await
        .ok()
        .flatten();
    let live_status = pod.as_ref().map_or("unknown".to_string(), |s| {
        if s.ready {
            "running".to_string()
        } else {
            s.phase.clone().map(|p| p.to_lowercase()).unwrap_or_else(|| "unknown".to_string())
        }
    });

    let mut body = serde_json::to_value(&record)?;
    body["status"] = json!(live_status);
    body["pod"] = json!(pod.map(|s| json!({ "phase": s.phase, "ready": s.ready, "ip": s.address })));
    Ok(Json(body))
}

pub async fn delete(State(state): State<AppState>, Path(username): Path<String>) -> GatewayResult<impl IntoResponse> {
    state.orchestrator.delete(&username).await?;
    Ok(Json(json!({ "status": "deleted", "username": username })))
}

pub async fn patch(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(req): Json<UpdateConfigRequest>,
) -> GatewayResult<impl IntoResponse> {
    let mut changes = serde_json::Map::new();
    if let Some(model) = &req.model {
        changes.insert("model".to_string(), json!(model));
    }
    if let Some(api_key) = &req.api_key {
        changes.insert("api_key".to_string(), json!(api_key));
    }
    if let Some(provider) = &req.llm_provider {
        changes.insert("llm_provider".to_string(), json!(provider));
    }
    if let Some(budget) = req.token_budget {
        changes.insert("token_budget".to_string(), json!(budget));
    }
    if let Some(enabled) = req.enable_agent_zero {
        changes.insert("enable_agent_zero".to_string(), json!(enabled));
    }
    if let Some(swarm_mode) = req.swarm_mode {
        changes.insert("swarm_mode".to_string(), json!(swarm_mode));
    }

    state.orchestrator.patch(&username, &req).await?;
    Ok(Json(json!({ "status": "updated", "username": username, "changes": changes })))
}

pub async fn restart(State(state): State<AppState>, Path(username): Path<String>) -> GatewayResult<impl IntoResponse> {
    state.orchestrator.restart(&username).await?;
    Ok(Json(json!({ "status": "restarting", "username": username })))
}

pub async fn chat(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(req): Json<ChatRequest>,
) -> GatewayResult<impl IntoResponse> {
    req.validate()?;
    let response = state.relay.chat(&username, &req.message).await?;
    Ok(Json(response))
}

pub async fn project(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(req): Json<ProjectRequest>,
) -> GatewayResult<impl IntoResponse> {
    let (project_name, path, response) = state.relay.create_project(&username, &req).await?;
    Ok(Json(json!({
        "status": "cloning",
        "project_name": project_name,
        "repo_url": req.repo_url,
        "path": path,
        "agent_response": response,
    })))
}

pub async fn workspace(State(state): State<AppState>, Path(username): Path<String>) -> GatewayResult<impl IntoResponse> {
    let (listing, projects) = state.relay.workspace(&username).await?;
    Ok(Json(json!({ "username": username, "workspace": listing, "projects": projects })))
}

pub async fn tasks(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(filter): Query<TaskListFilter>,
) -> GatewayResult<impl IntoResponse> {
    let response = state.relay.tasks(&username, filter.status.as_deref()).await?;
    Ok(Json(response))
}

pub async fn relay(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(req): Json<RelayRequest>,
) -> GatewayResult<impl IntoResponse> {
    req.validate()?;
    state.swarm.authorize_relay(&username, &req.from_agent).await?;
    let response = state.relay.chat(&username, &req.message).await?;
    Ok(Json(json!({ "to": username, "from": req.from_agent, "response": response })))
}
