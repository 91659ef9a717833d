//! Trait boundaries between the gateway's services and its
//! infrastructure: the cluster orchestrator, the tenant registry, and
//! the plan tracker store. Services depend only on these traits so
//! that tests can substitute in-memory or mock implementations.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::GatewayResult;
use crate::domain::models::{PlanTask, TenantMap};
use crate::domain::requests::PlanTaskFilter;

/// Live status of a workload as read from the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct WorkloadStatus {
    pub phase: Option<String>,
    pub ready: bool,
    pub address: Option<String>,
}

/// Narrow facade over the container orchestrator's API: create/replace/
/// delete of configuration objects, workloads, and endpoint objects,
/// plus a status read. Every method normalizes a name collision to
/// `GatewayError::Conflict` and a missing object to
/// `GatewayError::NotFound`; anything else becomes
/// `GatewayError::TransientFailure`.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Create a named ConfigMap-shaped object holding `data`. Replaces
    /// an existing object of the same name instead of failing.
    async fn create_or_replace_config_object(&self, name: &str, data: Value) -> GatewayResult<()>;

    /// Delete a named ConfigMap-shaped object. Tolerates absence.
    async fn delete_config_object(&self, name: &str) -> GatewayResult<()>;

    /// Read back a named ConfigMap-shaped object's `config.json` entry,
    /// parsed as JSON. Used by the Swarm Controller to inherit a
    /// coordinator's credential/provider/model when spawning a worker,
    /// since the Tenant Registry never stores credentials itself.
    /// Returns `Ok(None)` if the object does not exist.
    async fn read_config_object(&self, name: &str) -> GatewayResult<Option<Value>>;

    /// Create the named workload (Pod-shaped object) described by
    /// `manifest`. A name collision is a hard conflict, not tolerated.
    async fn create_workload(&self, name: &str, manifest: Value) -> GatewayResult<()>;

    /// Delete the named workload. Tolerates absence.
    async fn delete_workload(&self, name: &str) -> GatewayResult<()>;

    /// Create the named endpoint object (Service-shaped) described by
    /// `manifest`. A name collision is logged and tolerated.
    async fn create_or_replace_endpoint(&self, name: &str, manifest: Value) -> GatewayResult<()>;

    /// Delete the named endpoint object. Tolerates absence.
    async fn delete_endpoint(&self, name: &str) -> GatewayResult<()>;

    /// Read the live status of the named workload.
    ///
    /// Returns `Ok(None)` when the workload does not exist rather than
    /// an error — absence here is a normal, expected state.
    async fn read_workload_status(&self, name: &str) -> GatewayResult<Option<WorkloadStatus>>;
}

/// Persistence boundary for the single JSON tenant document.
#[async_trait]
pub trait TenantRegistry: Send + Sync {
    /// Load the full tenant map. Returns an empty map if the backing
    /// file does not yet exist.
    async fn load(&self) -> GatewayResult<TenantMap>;

    /// Atomically replace the full tenant map.
    async fn save(&self, tenants: TenantMap) -> GatewayResult<()>;
}

/// Persistence boundary for the plan task ledger.
#[async_trait]
pub trait PlanTrackerStore: Send + Sync {
    /// Seed the task table idempotently. Safe to call on every boot.
    async fn seed(&self) -> GatewayResult<()>;

    /// List tasks matching the given filter, ordered by (phase, task_id).
    async fn list(&self, filter: &PlanTaskFilter) -> GatewayResult<Vec<PlanTask>>;

    /// Update only the `status` and/or `notes` columns of a task,
    /// bumping `updated_at`. Returns `NotFound` if no row matches.
    async fn patch(
        &self,
        task_id: &str,
        status: Option<&str>,
        notes: Option<&str>,
    ) -> GatewayResult<()>;
}
