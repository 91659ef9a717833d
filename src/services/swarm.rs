//! Swarm Controller: spawns, terminates, and lists ephemeral worker
//! tenants under a coordinator, and authorizes relay calls from a
//! coordinator or one of its workers.

use std::sync::Arc;

use tracing::instrument;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::{TenantRecord, WorkerRecord};
use crate::domain::ports::ClusterClient;
use crate::domain::ports::TenantRegistry;
use crate::domain::requests::{CreateAgentRequest, WorkerRequest};
use crate::infrastructure::cluster::manifests;
use crate::infrastructure::config::GatewaySettings;
use crate::services::orchestrator::InstanceOrchestrator;

/// Hard-capped token budget for every spawned worker, regardless of
/// the coordinator's own budget.
pub const WORKER_TOKEN_BUDGET: i64 = 10_000;

pub struct SwarmController {
    orchestrator: Arc<InstanceOrchestrator>,
    cluster: Arc<dyn ClusterClient>,
    registry: Arc<dyn TenantRegistry>,
    settings: GatewaySettings,
}

/// Default worker id when none is explicitly requested: `"w" +
/// (now_ms mod 100000)`.
pub fn default_worker_id(now_ms: u128) -> String {
    format!("w{}", now_ms % 100_000)
}

/// Sanitize a worker id (explicit or generated): lowercase, map every
/// character outside `[a-z0-9-]` to `-`, truncate to 20 characters.
pub fn sanitize_worker_id(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let sanitized: String = lowered
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' { c } else { '-' })
        .collect();
    sanitized.chars().take(20).collect()
}

impl SwarmController {
    pub fn new(
        orchestrator: Arc<InstanceOrchestrator>,
        cluster: Arc<dyn ClusterClient>,
        registry: Arc<dyn TenantRegistry>,
        settings: GatewaySettings,
    ) -> Self {
        Self { orchestrator, cluster, registry, settings }
    }

    #[instrument(skip(self, req))]
    pub async fn spawn(&self, coordinator: &str, req: &WorkerRequest) -> GatewayResult<(TenantRecord, String)> {
        req.validate()?;

        let mut tenants = self.registry.load().await?;
        let info = tenants.get(coordinator).ok_or_else(|| GatewayError::NotFound(coordinator.to_string()))?;

        if !info.swarm_mode.unwrap_or(false) {
            return Err(GatewayError::Forbidden(
                coordinator.to_string(),
                "swarm mode is not enabled for this agent".to_string(),
            ));
        }

        let coordinator_config = self
            .cluster
            .read_config_object(&manifests::config_object_name(coordinator))
            .await?
            .ok_or_else(|| {
                GatewayError::ServiceUnavailable(coordinator.to_string(), "could not read coordinator configuration".to_string())
            })?;

        let provider = coordinator_config
            .get("llm_provider")
            .and_then(|v| v.as_str())
            .unwrap_or("openrouter")
            .to_string();
        let api_key = coordinator_config
            .get("llm_api_key")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                GatewayError::ServiceUnavailable(coordinator.to_string(), "could not read coordinator configuration".to_string())
            })?
            .to_string();
        let model = coordinator_config
            .get("llm_model")
            .and_then(|v| v.as_str())
            .unwrap_or("moonshotai/kimi-k2")
            .to_string();

        let now_ms = chrono::Utc::now().timestamp_millis().unsigned_abs() as u128;
        let raw_worker_id = req.worker_name.clone().unwrap_or_else(|| default_worker_id(now_ms));
        let worker_id = sanitize_worker_id(&raw_worker_id);
        let worker_username = format!("{coordinator}-{worker_id}");

        let create_req = CreateAgentRequest {
            username: worker_username.clone(),
            email: None,
            llm_provider: provider,
            api_key,
            model,
            soul: req.soul.clone(),
            telegram_token: None,
            telegram_chat_id: None,
            enable_webchat: false,
            enable_pii: true,
            enable_shield: true,
            enable_agent_zero: false,
            token_budget: WORKER_TOKEN_BUDGET,
        };

        let worker_record = self.orchestrator.create(&create_req).await?;

        let mut tenants = self.registry.load().await?;
        if let Some(coordinator_record) = tenants.get_mut(coordinator) {
            coordinator_record.workers.insert(
                worker_username.clone(),
                WorkerRecord {
                    task: req.task.clone(),
                    persona: req.soul.clone(),
                    workload_name: manifests::workload_name(&worker_username),
                    spawned_at: chrono::Utc::now(),
                    ttl_seconds: req.ttl_seconds,
                    status: "starting".to_string(),
                },
            );
        }
        if let Some(worker) = tenants.get_mut(&worker_username) {
            worker.is_worker = Some(true);
            worker.coordinator = Some(coordinator.to_string());
        }
        self.registry.save(tenants).await?;

        Ok((worker_record, worker_username))
    }

    /// Terminate a worker. Deletes its cluster objects unconditionally,
    /// even if the coordinator's registry record is missing, matching
    /// the platform's existing behavior: this is the one route that
    /// does not 404 on an absent coordinator.
    #[instrument(skip(self))]
    pub async fn terminate(&self, coordinator: &str, worker_id: &str) -> GatewayResult<String> {
        let worker_username = format!("{coordinator}-{worker_id}");
        self.orchestrator.delete_cluster_objects(&worker_username).await;

        let mut tenants = self.registry.load().await?;
        if let Some(coordinator_record) = tenants.get_mut(coordinator) {
            coordinator_record.workers.remove(&worker_username);
        }
        tenants.remove(&worker_username);
        self.registry.save(tenants).await?;

        Ok(worker_username)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, coordinator: &str) -> GatewayResult<Vec<(String, WorkerRecord, String)>> {
        let tenants = self.registry.load().await?;
        let info = tenants.get(coordinator).ok_or_else(|| GatewayError::NotFound(coordinator.to_string()))?;

        let mut results = Vec::new();
        for (worker_username, worker) in &info.workers {
            let status = self
                .cluster
                .read_workload_status(&worker.workload_name)
                .await
                .ok()
                .flatten();
            let status_str = match status {
                Some(s) if s.ready => "running".to_string(),
                Some(s) => s.phase.map(|p| p.to_lowercase()).unwrap_or_else(|| "gone".to_string()),
                None => "gone".to_string(),
            };
            results.push((worker_username.clone(), worker.clone(), status_str));
        }
        Ok(results)
    }

    /// Authorize a relay call: the `from_agent` must be either the
    /// coordinator itself or one of its registered workers.
    #[instrument(skip(self))]
    pub async fn authorize_relay(&self, to: &str, from_agent: &str) -> GatewayResult<()> {
        let tenants = self.registry.load().await?;
        let info = tenants.get(to).ok_or_else(|| GatewayError::NotFound(to.to_string()))?;

        let allowed = from_agent == to || info.workers.contains_key(from_agent);
        if allowed {
            Ok(())
        } else {
            Err(GatewayError::Forbidden(from_agent.to_string(), to.to_string()))
        }
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }
}
