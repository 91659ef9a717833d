//! Relay service: chat, project, workspace, and task-listing relays to
//! a tenant's running workload, composing the infrastructure-level
//! `RelayClient` with the Tenant Registry for project bookkeeping.

use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::ProjectRecord;
use crate::domain::ports::TenantRegistry;
use crate::domain::requests::ProjectRequest;
use crate::infrastructure::cluster::manifests;
use crate::infrastructure::config::GatewaySettings;
use crate::infrastructure::relay::{self, RelayClient};

pub struct RelayService {
    relay: RelayClient,
    registry: Arc<dyn TenantRegistry>,
    settings: GatewaySettings,
}

impl RelayService {
    pub fn new(relay: RelayClient, registry: Arc<dyn TenantRegistry>, settings: GatewaySettings) -> Self {
        Self { relay, registry, settings }
    }

    fn chat_url(&self, username: &str) -> String {
        manifests::workload_chat_url(username, &self.settings.namespace, self.settings.agent_port)
    }

    fn tasks_url(&self, username: &str) -> String {
        manifests::workload_tasks_url(username, &self.settings.namespace, self.settings.agent_port)
    }

    async fn require_tenant(&self, username: &str) -> GatewayResult<()> {
        let tenants = self.registry.load().await?;
        if tenants.contains_key(username) {
            Ok(())
        } else {
            Err(GatewayError::NotFound(username.to_string()))
        }
    }

    #[instrument(skip(self, message))]
    pub async fn chat(&self, username: &str, message: &str) -> GatewayResult<Value> {
        self.require_tenant(username).await?;
        self.relay.send_chat(username, &self.chat_url(username), message).await
    }

    /// Records the project regardless of the relay's response content
    /// (only a transport-level relay error aborts the request before
    /// the project is recorded). See DESIGN.md Open Question (b).
    #[instrument(skip(self, req))]
    pub async fn create_project(&self, username: &str, req: &ProjectRequest) -> GatewayResult<(String, String, Value)> {
        req.validate()?;

        let mut tenants = self.registry.load().await?;
        let record = tenants.get_mut(username).ok_or_else(|| GatewayError::NotFound(username.to_string()))?;

        let project_name = req
            .project_name
            .clone()
            .unwrap_or_else(|| relay::project_name_from_repo_url(&req.repo_url));
        let project_name = relay::sanitize_project_name(&project_name);
        let path = format!("/workspace/{project_name}");

        let instruction = format!(
            "clone the git repository {} branch {} into {path}",
            req.repo_url, req.branch
        );
        let response = self.relay.send_chat(username, &self.chat_url(username), &instruction).await?;

        record.projects.insert(
            project_name.clone(),
            ProjectRecord {
                repo_url: req.repo_url.clone(),
                branch: req.branch.clone(),
                created_at: chrono::Utc::now(),
                path: path.clone(),
            },
        );
        self.registry.save(tenants).await?;

        Ok((project_name, path, response))
    }

    #[instrument(skip(self))]
    pub async fn workspace(&self, username: &str) -> GatewayResult<(Value, Value)> {
        let tenants = self.registry.load().await?;
        let record = tenants.get(username).ok_or_else(|| GatewayError::NotFound(username.to_string()))?;

        let instruction = "list the contents of /workspace directory, show folder names and file counts";
        let listing = self.relay.send_chat(username, &self.chat_url(username), instruction).await?;
        let projects = serde_json::to_value(&record.projects)?;
        Ok((listing, projects))
    }

    #[instrument(skip(self))]
    pub async fn tasks(&self, username: &str, status: Option<&str>) -> GatewayResult<Value> {
        self.require_tenant(username).await?;
        self.relay.fetch_tasks(&self.tasks_url(username), status).await
    }
}
