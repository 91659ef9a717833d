//! Core data types shared across the gateway: tenant records, the
//! configuration bundle materialized into each workload, workload/
//! endpoint specifications, and plan tasks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Fixed per-provider chat-completions endpoint, keyed by `provider`.
/// Unknown providers fall back to `openrouter`.
pub fn provider_endpoint(provider: &str) -> &'static str {
    match provider {
        "openai" => "https://api.openai.com/v1/chat/completions",
        "anthropic" => "https://api.anthropic.com/v1/messages",
        "google" => "https://generativelanguage.googleapis.com/v1beta/models",
        "ollama" => "http://localhost:11434/v1/chat/completions",
        _ => "https://openrouter.ai/api/v1/chat/completions",
    }
}

/// A record of a single worker tenant nested under its coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub task: String,
    pub persona: String,
    pub workload_name: String,
    pub spawned_at: chrono::DateTime<chrono::Utc>,
    pub ttl_seconds: u32,
    pub status: String,
}

/// A record of a project cloned into a tenant's shared workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub repo_url: String,
    pub branch: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub path: String,
}

/// The persisted record of a single tenant, coordinator or worker.
///
/// This is the unit of storage in the Tenant Registry's single JSON
/// document. Credentials and the bridge token are never stored here —
/// only in the Configuration Bundle materialized to the cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantRecord {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub llm_provider: String,
    pub model: String,
    pub soul: String,
    pub has_telegram: bool,
    pub has_webchat: bool,
    pub enable_agent_zero: bool,
    pub token_budget: i64,
    pub workload_name: String,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swarm_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub projects: HashMap<String, ProjectRecord>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub workers: HashMap<String, WorkerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_worker: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinator: Option<String>,
}

/// The full document persisted at `${DATA_DIR}/instances.json`: a map
/// from username to tenant record.
pub type TenantMap = HashMap<String, TenantRecord>;

/// The per-tenant configuration object materialized as `config.json`
/// into the workload's volume (and mirrored into a ConfigMap).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigBundle {
    pub llm_provider: String,
    pub llm_api_key: String,
    pub llm_api_url: String,
    pub llm_model: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub max_tool_rounds: u32,
    pub pii_categories: u32,
    pub seazero_enabled: bool,
    pub seazero_token: String,
    pub seazero_agent_url: String,
    pub seazero_budget: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swarm_mode: Option<bool>,
}

impl ConfigBundle {
    /// Fixed bitmask applied when PII filtering is enabled.
    pub const PII_CATEGORIES_ENABLED: u32 = 31;
    pub const MAX_TOKENS: u32 = 4096;
    pub const TEMPERATURE: f32 = 0.7;
    pub const MAX_TOOL_ROUNDS: u32 = 5;
    pub const AGENT_ZERO_PORT: u16 = 8080;

    pub fn privileged_runtime_url(namespace: &str) -> String {
        format!("http://agent-zero-svc.{namespace}.svc.cluster.local:{}", Self::AGENT_ZERO_PORT)
    }
}

/// A persona document: free-form system-prompt-shaping text, resolved
/// by identifier with a fallback default when no matching persona
/// exists.
pub struct PersonaDocument;

impl PersonaDocument {
    /// Fallback single-line persona used when the requested identifier
    /// has no corresponding document.
    pub fn fallback(persona: &str) -> String {
        let title = persona
            .chars()
            .enumerate()
            .map(|(i, c)| if i == 0 { c.to_ascii_uppercase() } else { c })
            .collect::<String>();
        format!("# {title}\nYou are a helpful AI assistant.")
    }
}

/// A single row of the Plan Tracker Store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTask {
    pub id: i64,
    pub phase: String,
    pub task_id: String,
    pub sprint: i64,
    pub title: String,
    pub effort: String,
    pub status: String,
    #[serde(default)]
    pub files: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A declared resource floor/ceiling applied to every workload's main
/// container. Fixed, not user-configurable.
pub struct ResourceBounds;

impl ResourceBounds {
    pub const REQUEST_CPU: &'static str = "50m";
    pub const REQUEST_MEMORY: &'static str = "32Mi";
    pub const LIMIT_CPU: &'static str = "500m";
    pub const LIMIT_MEMORY: &'static str = "128Mi";
}
