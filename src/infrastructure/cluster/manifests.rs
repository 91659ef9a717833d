//! Builders for the JSON manifests submitted to the orchestrator.
//!
//! These mirror, field for field, the ConfigMap/Pod/Service bodies the
//! platform has always submitted, so a rolling upgrade from the prior
//! implementation to this one does not change what ends up in the
//! cluster.

use serde_json::{json, Value};

use crate::domain::models::{provider_endpoint, ConfigBundle, ResourceBounds};

pub const AGENT_WEBCHAT_PORT: u16 = 8899;

/// Name of the ConfigMap carrying the rendered `config.json`.
pub fn config_object_name(username: &str) -> String {
    format!("seaclaw-config-{username}")
}

/// Name of the ConfigMap carrying the rendered persona document.
pub fn soul_object_name(username: &str) -> String {
    format!("seaclaw-soul-{username}")
}

/// Name of the tenant's workload.
pub fn workload_name(username: &str) -> String {
    format!("seaclaw-{username}")
}

/// Name of the tenant's endpoint object.
pub fn endpoint_name(username: &str) -> String {
    format!("seaclaw-{username}-svc")
}

/// Cluster-DNS address of a tenant's chat endpoint.
pub fn workload_chat_url(username: &str, namespace: &str, agent_port: u16) -> String {
    format!("http://seaclaw-{username}-svc.{namespace}.svc.cluster.local:{agent_port}/api/chat")
}

/// Cluster-DNS address of a tenant's task-listing endpoint.
pub fn workload_tasks_url(username: &str, namespace: &str, agent_port: u16) -> String {
    format!("http://seaclaw-{username}-svc.{namespace}.svc.cluster.local:{agent_port}/api/tasks")
}

/// Build the `ConfigBundle` materialized for a tenant's configuration
/// object, deriving the provider endpoint URL and privileged-runtime
/// endpoint URL and generating a fresh bridge token.
#[allow(clippy::too_many_arguments)]
pub fn build_config_bundle(
    provider: &str,
    api_key: &str,
    model: &str,
    enable_pii: bool,
    enable_agent_zero: bool,
    token_budget: i64,
    namespace: &str,
    bridge_token: String,
) -> ConfigBundle {
    ConfigBundle {
        llm_provider: provider.to_string(),
        llm_api_key: api_key.to_string(),
        llm_api_url: provider_endpoint(provider).to_string(),
        llm_model: model.to_string(),
        system_prompt: None,
        max_tokens: ConfigBundle::MAX_TOKENS,
        temperature: ConfigBundle::TEMPERATURE,
        max_tool_rounds: ConfigBundle::MAX_TOOL_ROUNDS,
        pii_categories: if enable_pii { ConfigBundle::PII_CATEGORIES_ENABLED } else { 0 },
        seazero_enabled: enable_agent_zero,
        seazero_token: bridge_token,
        seazero_agent_url: ConfigBundle::privileged_runtime_url(namespace),
        seazero_budget: token_budget,
        swarm_mode: None,
    }
}

/// Render a ConfigMap-shaped manifest carrying a single text entry.
pub fn text_config_object(name: &str, key: &str, contents: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": { "name": name },
        "data": { key: contents }
    })
}

/// Render the Pod-shaped manifest for a tenant workload.
pub fn pod_manifest(
    username: &str,
    persona: &str,
    image: &str,
    env_vars: &[(String, String)],
) -> Value {
    let env_json: Vec<Value> = env_vars
        .iter()
        .map(|(k, v)| json!({ "name": k, "value": v }))
        .collect();

    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": workload_name(username),
            "labels": { "app": "seaclaw-instance", "user": username, "persona": persona }
        },
        "spec": {
            "restartPolicy": "Always",
            "initContainers": [{
                "name": "init-config",
                "image": "busybox:1.36",
                "command": ["sh", "-c", "cp /cfg/config.json /userdata/config.json && cp /soul/SOUL.md /userdata/SOUL.md"],
                "volumeMounts": [
                    { "name": "config", "mountPath": "/cfg" },
                    { "name": "soul", "mountPath": "/soul" },
                    { "name": "user-data", "mountPath": "/userdata", "subPath": username }
                ]
            }],
            "containers": [{
                "name": "seaclaw",
                "image": image,
                "imagePullPolicy": "IfNotPresent",
                "env": env_json,
                "ports": [{ "containerPort": AGENT_WEBCHAT_PORT, "name": "webchat" }],
                "resources": {
                    "requests": { "cpu": ResourceBounds::REQUEST_CPU, "memory": ResourceBounds::REQUEST_MEMORY },
                    "limits": { "cpu": ResourceBounds::LIMIT_CPU, "memory": ResourceBounds::LIMIT_MEMORY }
                },
                "command": ["sea_claw"],
                "args": ["--config", "/userdata/config.json", "--db", "/userdata/seaclaw.db", "--gateway"],
                "volumeMounts": [
                    { "name": "user-data", "mountPath": "/userdata", "subPath": username },
                    { "name": "shared-workspace", "mountPath": "/workspace" }
                ]
            }],
            "volumes": [
                { "name": "config", "configMap": { "name": config_object_name(username) } },
                { "name": "soul", "configMap": { "name": soul_object_name(username) } },
                { "name": "user-data", "persistentVolumeClaim": { "claimName": "seaclaw-user-data" } },
                { "name": "shared-workspace", "persistentVolumeClaim": { "claimName": "seaclaw-shared-workspace" } }
            ]
        }
    })
}

/// Render the Service-shaped manifest exposing a tenant workload.
pub fn service_manifest(username: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": { "name": endpoint_name(username) },
        "spec": {
            "type": "ClusterIP",
            "selector": { "app": "seaclaw-instance", "user": username },
            "ports": [{ "port": AGENT_WEBCHAT_PORT, "name": "webchat", "targetPort": AGENT_WEBCHAT_PORT }]
        }
    })
}

/// Build the main container's declared environment variables.
pub fn build_env_vars(
    username: &str,
    namespace: &str,
    telegram_token: Option<&str>,
    telegram_chat_id: Option<&str>,
) -> Vec<(String, String)> {
    let mut vars = vec![
        ("SEA_LOG_LEVEL".to_string(), "info".to_string()),
        ("SEA_API_BIND_ALL".to_string(), "1".to_string()),
        ("SEA_USERNAME".to_string(), username.to_string()),
        (
            "SEA_GATEWAY_URL".to_string(),
            format!("http://gateway-svc.{namespace}.svc.cluster.local:8090"),
        ),
        ("SEA_DB".to_string(), "/userdata/seaclaw.db".to_string()),
    ];
    if let Some(token) = telegram_token {
        vars.push(("TELEGRAM_BOT_TOKEN".to_string(), token.to_string()));
    }
    if let Some(chat_id) = telegram_chat_id {
        vars.push(("TELEGRAM_CHAT_ID".to_string(), chat_id.to_string()));
    }
    vars
}
