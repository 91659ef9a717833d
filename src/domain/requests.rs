//! Inbound request shapes and their validation rules.
//!
//! Each `validate` method enforces exactly the constraints named in the
//! HTTP API surface: username pattern, key lengths, budget bounds, TTL
//! bounds, message lengths. Validation runs before any dispatch to a
//! service, per the "validate before dispatch" rule.

use serde::Deserialize;

use crate::domain::errors::GatewayError;

fn is_valid_username(s: &str) -> bool {
    let len_ok = (2..=32).contains(&s.len());
    len_ok && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Validate a username against `^[a-z0-9_-]{2,32}$`.
pub fn validate_username(username: &str) -> Result<(), GatewayError> {
    if is_valid_username(username) {
        Ok(())
    } else {
        Err(GatewayError::Validation(format!(
            "username '{username}' must match ^[a-z0-9_-]{{2,32}}$"
        )))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAgentRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_provider")]
    pub llm_provider: String,
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_soul")]
    pub soul: String,
    #[serde(default)]
    pub telegram_token: Option<String>,
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
    #[serde(default = "default_true")]
    pub enable_webchat: bool,
    #[serde(default = "default_true")]
    pub enable_pii: bool,
    #[serde(default = "default_true")]
    pub enable_shield: bool,
    #[serde(default = "default_true")]
    pub enable_agent_zero: bool,
    #[serde(default = "default_token_budget")]
    pub token_budget: i64,
}

fn default_provider() -> String {
    "openrouter".to_string()
}
fn default_model() -> String {
    "moonshotai/kimi-k2".to_string()
}
fn default_soul() -> String {
    "alex".to_string()
}
fn default_true() -> bool {
    true
}
fn default_token_budget() -> i64 {
    100_000
}

impl CreateAgentRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        validate_username(&self.username)?;
        if self.api_key.len() < 5 {
            return Err(GatewayError::Validation("api_key must be at least 5 characters".into()));
        }
        if !(1_000..=1_000_000).contains(&self.token_budget) {
            return Err(GatewayError::Validation(
                "token_budget must be between 1000 and 1000000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateConfigRequest {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub llm_provider: Option<String>,
    #[serde(default)]
    pub token_budget: Option<i64>,
    #[serde(default)]
    pub enable_agent_zero: Option<bool>,
    #[serde(default)]
    pub swarm_mode: Option<bool>,
}

impl UpdateConfigRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if let Some(budget) = self.token_budget {
            if !(1_000..=1_000_000).contains(&budget) {
                return Err(GatewayError::Validation(
                    "token_budget must be between 1000 and 1000000".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if !(1..=8192).contains(&self.message.len()) {
            return Err(GatewayError::Validation(
                "message must be between 1 and 8192 characters".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRequest {
    pub repo_url: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

impl ProjectRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.repo_url.len() < 5 {
            return Err(GatewayError::Validation("repo_url must be at least 5 characters".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerRequest {
    pub task: String,
    #[serde(default)]
    pub worker_name: Option<String>,
    #[serde(default = "default_soul")]
    pub soul: String,
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u32,
}

fn default_ttl_seconds() -> u32 {
    300
}

impl WorkerRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if !(1..=4096).contains(&self.task.len()) {
            return Err(GatewayError::Validation(
                "task must be between 1 and 4096 characters".into(),
            ));
        }
        if !(30..=3600).contains(&self.ttl_seconds) {
            return Err(GatewayError::Validation(
                "ttl_seconds must be between 30 and 3600".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayRequest {
    pub from_agent: String,
    pub message: String,
}

impl RelayRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if !(1..=8192).contains(&self.message.len()) {
            return Err(GatewayError::Validation(
                "message must be between 1 and 8192 characters".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatchPlanTaskRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PatchPlanTaskRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if let Some(status) = &self.status {
            if !matches!(status.as_str(), "todo" | "in_progress" | "done" | "blocked") {
                return Err(GatewayError::Validation(format!(
                    "status '{status}' must be one of todo, in_progress, done, blocked"
                )));
            }
        }
        if self.status.is_none() && self.notes.is_none() {
            return Err(GatewayError::Validation(
                "at least one of status or notes must be supplied".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PlanTaskFilter {
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub sprint: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TaskListFilter {
    #[serde(default)]
    pub status: Option<String>,
}
