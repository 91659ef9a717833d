//! In-memory test doubles for the gateway's port traits, plus a helper
//! to stand up a fully wired `AppState`/`Router` without a real
//! container orchestrator or SQLite file.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use seaclaw_gateway::domain::errors::GatewayResult;
use seaclaw_gateway::domain::models::{PlanTask, TenantMap};
use seaclaw_gateway::domain::ports::{ClusterClient, PlanTrackerStore, TenantRegistry, WorkloadStatus};
use seaclaw_gateway::domain::requests::PlanTaskFilter;
use seaclaw_gateway::http::{build_router, AppState};
use seaclaw_gateway::infrastructure::config::GatewaySettings;
use seaclaw_gateway::infrastructure::relay::RelayClient;
use seaclaw_gateway::services::{InstanceOrchestrator, RelayService, SwarmController};
use serde_json::Value;
use tokio::sync::Mutex;

/// An in-memory stand-in for the container orchestrator. Every config
/// object written by `InstanceOrchestrator::create`/`patch` is kept so
/// `read_config_object` (used by the Swarm Controller to inherit
/// credentials) round-trips realistically.
#[derive(Default)]
pub struct FakeCluster {
    config_objects: Mutex<HashMap<String, Value>>,
    workloads: Mutex<HashMap<String, Value>>,
    endpoints: Mutex<HashMap<String, Value>>,
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn create_or_replace_config_object(&self, name: &str, data: Value) -> GatewayResult<()> {
        // `data` is the ConfigMap-shaped manifest; unwrap its
        // `data."config.json"` text entry the way the real HTTP client's
        // `read_config_object` would, so reads see the same shape.
        let text = data.pointer("/data/config.json").and_then(Value::as_str).map(str::to_string);
        let text = match text {
            Some(t) => t,
            None => data.pointer("/data/SOUL.md").and_then(Value::as_str).map(str::to_string).unwrap_or_default(),
        };
        self.config_objects.lock().await.insert(name.to_string(), serde_json::json!({ "raw": text }));
        Ok(())
    }

    async fn read_config_object(&self, name: &str) -> GatewayResult<Option<Value>> {
        let objects = self.config_objects.lock().await;
        Ok(objects.get(name).and_then(|v| v.get("raw")).and_then(Value::as_str).and_then(|t| serde_json::from_str(t).ok()))
    }

    async fn delete_config_object(&self, name: &str) -> GatewayResult<()> {
        self.config_objects.lock().await.remove(name);
        Ok(())
    }

    async fn create_workload(&self, name: &str, manifest: Value) -> GatewayResult<()> {
        let mut workloads = self.workloads.lock().await;
        if workloads.contains_key(name) {
            return Err(seaclaw_gateway::domain::errors::GatewayError::Conflict(name.to_string()));
        }
        workloads.insert(name.to_string(), manifest);
        Ok(())
    }

    async fn delete_workload(&self, name: &str) -> GatewayResult<()> {
        self.workloads.lock().await.remove(name);
        Ok(())
    }

    async fn create_or_replace_endpoint(&self, name: &str, manifest: Value) -> GatewayResult<()> {
        self.endpoints.lock().await.insert(name.to_string(), manifest);
        Ok(())
    }

    async fn delete_endpoint(&self, name: &str) -> GatewayResult<()> {
        self.endpoints.lock().await.remove(name);
        Ok(())
    }

    async fn read_workload_status(&self, name: &str) -> GatewayResult<Option<WorkloadStatus>> {
        let workloads = self.workloads.lock().await;
        Ok(workloads
            .get(name)
            .map(|_| WorkloadStatus { phase: Some("Running".to_string()), ready: true, address: Some("10.0.0.1".to_string()) }))
    }
}

impl FakeCluster {
    /// Test-only accessor returning the raw text a config object was
    /// created with, bypassing `read_config_object`'s JSON parsing
    /// (which only suits `config.json`, not the free-form `SOUL.md`).
    pub async fn raw_config_text(&self, name: &str) -> Option<String> {
        let objects = self.config_objects.lock().await;
        objects.get(name).and_then(|v| v.get("raw")).and_then(Value::as_str).map(str::to_string)
    }
}

#[derive(Default)]
pub struct FakeRegistry {
    tenants: Mutex<TenantMap>,
}

#[async_trait]
impl TenantRegistry for FakeRegistry {
    async fn load(&self) -> GatewayResult<TenantMap> {
        Ok(self.tenants.lock().await.clone())
    }

    async fn save(&self, tenants: TenantMap) -> GatewayResult<()> {
        *self.tenants.lock().await = tenants;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePlanTracker {
    tasks: Mutex<Vec<PlanTask>>,
}

#[async_trait]
impl PlanTrackerStore for FakePlanTracker {
    async fn seed(&self) -> GatewayResult<()> {
        let mut tasks = self.tasks.lock().await;
        if tasks.is_empty() {
            tasks.push(PlanTask {
                id: 1,
                phase: "P1".to_string(),
                task_id: "P1-01".to_string(),
                sprint: 1,
                title: "Agent status card on dashboard".to_string(),
                effort: "M".to_string(),
                status: "todo".to_string(),
                files: None,
                notes: None,
                created_at: "2026-01-01T00:00:00Z".to_string(),
                updated_at: "2026-01-01T00:00:00Z".to_string(),
            });
        }
        Ok(())
    }

    async fn list(&self, filter: &PlanTaskFilter) -> GatewayResult<Vec<PlanTask>> {
        let tasks = self.tasks.lock().await;
        Ok(tasks
            .iter()
            .filter(|t| filter.phase.as_deref().is_none_or(|p| p == t.phase))
            .filter(|t| filter.sprint.is_none_or(|s| s == t.sprint))
            .filter(|t| filter.status.as_deref().is_none_or(|s| s == t.status))
            .cloned()
            .collect())
    }

    async fn patch(&self, task_id: &str, status: Option<&str>, notes: Option<&str>) -> GatewayResult<()> {
        let mut tasks = self.tasks.lock().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.task_id == task_id)
            .ok_or_else(|| seaclaw_gateway::domain::errors::GatewayError::NotFound(task_id.to_string()))?;
        if let Some(status) = status {
            task.status = status.to_string();
        }
        if let Some(notes) = notes {
            task.notes = Some(notes.to_string());
        }
        Ok(())
    }
}

/// Build a full `Router` over in-memory fakes, with `max_instances`
/// configurable per test (used by the registry-full boundary test).
pub fn test_router(max_instances: usize) -> axum::Router {
    test_router_with_settings(GatewaySettings { max_instances, ..GatewaySettings::default() })
}

/// Build a full `Router` over in-memory fakes, with the full
/// `GatewaySettings` supplied by the caller (used by tests that need to
/// point `persona_dir` at a temp directory).
pub fn test_router_with_settings(settings: GatewaySettings) -> axum::Router {
    build_app(settings).0
}

/// Like `test_router_with_settings`, but also hands back the shared
/// `FakeCluster` so a test can inspect the config objects a create
/// call submitted (e.g. the rendered `SOUL.md` persona text).
pub fn build_app(settings: GatewaySettings) -> (axum::Router, Arc<FakeCluster>) {
    let cluster = Arc::new(FakeCluster::default());
    let cluster_trait: Arc<dyn ClusterClient> = cluster.clone();
    let registry: Arc<dyn TenantRegistry> = Arc::new(FakeRegistry::default());
    let plan_tracker: Arc<dyn PlanTrackerStore> = Arc::new(FakePlanTracker::default());

    let orchestrator = Arc::new(InstanceOrchestrator::new(cluster_trait.clone(), registry.clone(), settings.clone()));
    let relay = Arc::new(RelayService::new(RelayClient::new(), registry.clone(), settings.clone()));
    let swarm = Arc::new(SwarmController::new(orchestrator.clone(), cluster_trait, registry, settings.clone()));

    let router = build_router(AppState { orchestrator, relay, swarm, plan_tracker, settings });
    (router, cluster)
}
