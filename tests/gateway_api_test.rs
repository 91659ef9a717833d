//! End-to-end exercises of the HTTP API surface against in-memory
//! fakes for the orchestrator, registry, and plan tracker. No real
//! container orchestrator, cluster DNS, or SQLite file is involved.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{build_app, test_router};
use http_body_util::BodyExt;
use seaclaw_gateway::infrastructure::cluster::manifests;
use seaclaw_gateway::infrastructure::config::GatewaySettings;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(router: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(v) => Body::from(serde_json::to_vec(&v).unwrap()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

fn create_request(username: &str) -> Value {
    json!({
        "username": username,
        "api_key": "sk-test-0123456789",
        "soul": "alex",
    })
}

#[tokio::test]
async fn health_check_reports_ok() {
    let router = test_router(5);
    let (status, _) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn create_then_get_round_trips_the_tenant() {
    let router = test_router(5);

    let (status, body) = send(&router, "POST", "/api/v1/agents/create", Some(create_request("alice"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["webchat_url"], "/chat/alice");

    let (status, body) = send(&router, "GET", "/api/v1/agents/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["llm_provider"], "openrouter");

    let (status, body) = send(&router, "GET", "/api/v1/agents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["max"], 5);
}

#[tokio::test]
async fn duplicate_username_is_rejected_with_conflict() {
    let router = test_router(5);
    let (status, _) = send(&router, "POST", "/api/v1/agents/create", Some(create_request("bob"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, "POST", "/api/v1/agents/create", Some(create_request("bob"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("bob"));
}

#[tokio::test]
async fn registry_at_capacity_rejects_new_creates() {
    let router = test_router(1);
    let (status, _) = send(&router, "POST", "/api/v1/agents/create", Some(create_request("only-one"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, "POST", "/api/v1/agents/create", Some(create_request("one-too-many"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("registry is full"));
}

#[tokio::test]
async fn invalid_username_is_rejected_before_touching_the_registry() {
    let router = test_router(5);
    let (status, _) = send(&router, "POST", "/api/v1/agents/create", Some(create_request("AB"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_unknown_agent_is_not_found() {
    let router = test_router(5);
    let (status, _) = send(&router, "GET", "/api/v1/agents/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_updates_recognized_fields_and_preserves_the_record() {
    let router = test_router(5);
    send(&router, "POST", "/api/v1/agents/create", Some(create_request("carol"))).await;

    let (status, body) = send(
        &router,
        "PATCH",
        "/api/v1/agents/carol/config",
        Some(json!({ "model": "anthropic/claude-3-opus", "token_budget": 50_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "updated");
    assert_eq!(body["username"], "carol");
    assert_eq!(body["changes"]["model"], "anthropic/claude-3-opus");
    assert_eq!(body["changes"]["token_budget"], 50_000);
    assert!(body["changes"].get("llm_provider").is_none());

    let (status, body) = send(&router, "GET", "/api/v1/agents/carol", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "anthropic/claude-3-opus");
    // Fields untouched by the patch survive.
    assert_eq!(body["llm_provider"], "openrouter");
}

#[tokio::test]
async fn patch_unknown_agent_is_not_found() {
    let router = test_router(5);
    let (status, _) = send(&router, "PATCH", "/api/v1/agents/ghost/config", Some(json!({ "model": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_confirms_removal() {
    let router = test_router(5);
    send(&router, "POST", "/api/v1/agents/create", Some(create_request("dana"))).await;

    let (status, body) = send(&router, "DELETE", "/api/v1/agents/dana", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "deleted");

    let (status, _) = send(&router, "GET", "/api/v1/agents/dana", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chat_message_length_boundaries_are_enforced() {
    let router = test_router(5);
    send(&router, "POST", "/api/v1/agents/create", Some(create_request("erin"))).await;

    let (status, _) = send(&router, "POST", "/api/v1/agents/erin/chat", Some(json!({ "message": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let too_long = "x".repeat(8193);
    let (status, _) = send(&router, "POST", "/api/v1/agents/erin/chat", Some(json!({ "message": too_long }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn swarm_spawn_requires_swarm_mode_to_be_enabled() {
    let router = test_router(5);
    send(&router, "POST", "/api/v1/agents/create", Some(create_request("frank"))).await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/agents/frank/workers",
        Some(json!({ "task": "summarize the changelog" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("swarm mode"));
}

#[tokio::test]
async fn swarm_spawn_succeeds_once_enabled_and_lists_then_terminates() {
    let router = test_router(5);
    send(&router, "POST", "/api/v1/agents/create", Some(create_request("grace"))).await;
    send(&router, "PATCH", "/api/v1/agents/grace/config", Some(json!({ "swarm_mode": true }))).await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/agents/grace/workers",
        Some(json!({ "task": "summarize the changelog", "ttl_seconds": 60 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "spawning");
    let worker_username = body["worker_username"].as_str().unwrap().to_string();
    assert!(worker_username.starts_with("grace-"));

    let (status, body) = send(&router, "GET", "/api/v1/agents/grace/workers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coordinator"], "grace");
    assert_eq!(body["count"], 1);

    let worker_id = worker_username.strip_prefix("grace-").unwrap();
    let (status, body) =
        send(&router, "DELETE", &format!("/api/v1/agents/grace/workers/{worker_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "terminated");

    let (status, body) = send(&router, "GET", "/api/v1/agents/grace/workers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn worker_task_and_ttl_boundaries_are_enforced() {
    let router = test_router(5);
    send(&router, "POST", "/api/v1/agents/create", Some(create_request("henry"))).await;
    send(&router, "PATCH", "/api/v1/agents/henry/config", Some(json!({ "swarm_mode": true }))).await;

    let (status, _) = send(&router, "POST", "/api/v1/agents/henry/workers", Some(json!({ "task": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        "POST",
        "/api/v1/agents/henry/workers",
        Some(json!({ "task": "do something", "ttl_seconds": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn relay_from_an_unrelated_agent_is_forbidden() {
    let router = test_router(5);
    send(&router, "POST", "/api/v1/agents/create", Some(create_request("iris"))).await;
    send(&router, "POST", "/api/v1/agents/create", Some(create_request("stranger"))).await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/agents/iris/relay",
        Some(json!({ "from_agent": "stranger", "message": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("stranger"));
}

#[tokio::test]
async fn create_reads_the_named_persona_document_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("alex.md"), "# Alex\nYou are a meticulous code reviewer.").unwrap();

    let settings =
        GatewaySettings { persona_dir: dir.path().to_string_lossy().to_string(), ..GatewaySettings::default() };
    let (router, cluster) = build_app(settings);

    send(&router, "POST", "/api/v1/agents/create", Some(create_request("jules"))).await;

    let soul = cluster.raw_config_text(&manifests::soul_object_name("jules")).await.unwrap();
    assert_eq!(soul, "# Alex\nYou are a meticulous code reviewer.");
}

#[tokio::test]
async fn create_falls_back_to_the_generic_persona_when_the_file_is_missing() {
    let dir = tempfile::tempdir().unwrap();

    let settings =
        GatewaySettings { persona_dir: dir.path().to_string_lossy().to_string(), ..GatewaySettings::default() };
    let (router, cluster) = build_app(settings);

    send(&router, "POST", "/api/v1/agents/create", Some(create_request("kim"))).await;

    let soul = cluster.raw_config_text(&manifests::soul_object_name("kim")).await.unwrap();
    assert!(soul.contains("You are a helpful AI assistant."));
}

#[tokio::test]
async fn platform_tasks_are_seeded_listed_and_patched() {
    let router = test_router(5);

    let (status, body) = send(&router, "GET", "/api/v1/platform/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["tasks"][0]["task_id"], "P1-01");

    let (status, body) = send(
        &router,
        "PATCH",
        "/api/v1/platform/tasks/P1-01",
        Some(json!({ "status": "in_progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "updated");

    let (status, _) = send(&router, "PATCH", "/api/v1/platform/tasks/P1-01", Some(json!({ "status": "bogus" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&router, "PATCH", "/api/v1/platform/tasks/P1-01", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&router, "PATCH", "/api/v1/platform/tasks/does-not-exist", Some(json!({ "status": "done" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
