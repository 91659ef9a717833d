//! Instance Orchestrator: creates, deletes, patches, and reads the
//! status of tenant instances by composing the Cluster Client Facade
//! and the Tenant Registry. Never rolls back a partially completed
//! create — orphaned cluster objects are reaped by the next delete.

use std::sync::Arc;

use rand::RngCore;
use tracing::instrument;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::{provider_endpoint, TenantRecord};
use crate::domain::ports::ClusterClient;
use crate::domain::ports::TenantRegistry;
use crate::domain::requests::CreateAgentRequest;
use crate::infrastructure::cluster::manifests;
use crate::infrastructure::config::GatewaySettings;

pub struct InstanceOrchestrator {
    cluster: Arc<dyn ClusterClient>,
    registry: Arc<dyn TenantRegistry>,
    settings: GatewaySettings,
}

/// Generate a fresh bridge token: 32 random bytes, hex-encoded. Wholly
/// opaque consumed-by-the-workload material — this gateway never
/// validates or interprets it.
fn generate_bridge_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl InstanceOrchestrator {
    pub fn new(cluster: Arc<dyn ClusterClient>, registry: Arc<dyn TenantRegistry>, settings: GatewaySettings) -> Self {
        Self { cluster, registry, settings }
    }

    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn create(&self, req: &CreateAgentRequest) -> GatewayResult<TenantRecord> {
        req.validate()?;

        let tenants = self.registry.load().await?;
        if tenants.len() >= self.settings.max_instances {
            return Err(GatewayError::Validation(format!(
                "registry is full ({} of {} instances)",
                tenants.len(),
                self.settings.max_instances
            )));
        }
        if tenants.contains_key(&req.username) {
            return Err(GatewayError::Conflict(req.username.clone()));
        }
        drop(tenants);

        let bridge_token = generate_bridge_token();
        let bundle = manifests::build_config_bundle(
            &req.llm_provider,
            &req.api_key,
            &req.model,
            req.enable_pii,
            req.enable_agent_zero,
            req.token_budget,
            &self.settings.namespace,
            bridge_token,
        );
        let config_value = serde_json::to_value(&bundle)?;

        self.cluster
            .create_or_replace_config_object(
                &manifests::config_object_name(&req.username),
                manifests::text_config_object(
                    &manifests::config_object_name(&req.username),
                    "config.json",
                    &serde_json::to_string(&config_value)?,
                ),
            )
            .await?;

        let persona_path = std::path::Path::new(&self.settings.persona_dir).join(format!("{}.md", req.soul));
        let persona_text = tokio::fs::read_to_string(&persona_path)
            .await
            .unwrap_or_else(|_| crate::domain::models::PersonaDocument::fallback(&req.soul));
        self.cluster
            .create_or_replace_config_object(
                &manifests::soul_object_name(&req.username),
                manifests::text_config_object(&manifests::soul_object_name(&req.username), "SOUL.md", &persona_text),
            )
            .await?;

        let env_vars = manifests::build_env_vars(
            &req.username,
            &self.settings.namespace,
            req.telegram_token.as_deref(),
            req.telegram_chat_id.as_deref(),
        );
        let pod = manifests::pod_manifest(&req.username, &req.soul, &self.settings.seaclaw_image, &env_vars);
        self.cluster.create_workload(&manifests::workload_name(&req.username), pod).await?;

        self.cluster
            .create_or_replace_endpoint(&manifests::endpoint_name(&req.username), manifests::service_manifest(&req.username))
            .await?;

        let record = TenantRecord {
            username: req.username.clone(),
            email: req.email.clone(),
            llm_provider: req.llm_provider.clone(),
            model: req.model.clone(),
            soul: req.soul.clone(),
            has_telegram: req.telegram_token.is_some(),
            has_webchat: req.enable_webchat,
            enable_agent_zero: req.enable_agent_zero,
            token_budget: req.token_budget,
            workload_name: manifests::workload_name(&req.username),
            status: "starting".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: None,
            swarm_mode: None,
            projects: Default::default(),
            workers: Default::default(),
            is_worker: None,
            coordinator: None,
        };

        let mut tenants = self.registry.load().await?;
        tenants.insert(req.username.clone(), record.clone());
        self.registry.save(tenants).await?;

        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, username: &str) -> GatewayResult<()> {
        let mut tenants = self.registry.load().await?;
        if !tenants.contains_key(username) {
            return Err(GatewayError::NotFound(username.to_string()));
        }

        self.delete_cluster_objects(username).await;

        tenants.remove(username);
        self.registry.save(tenants).await?;
        Ok(())
    }

    /// Delete a tenant's cluster objects without touching the registry.
    /// Idempotent and best-effort: used both by `delete` and to reap
    /// a worker's objects when its coordinator record is absent.
    pub async fn delete_cluster_objects(&self, username: &str) {
        let _ = self.cluster.delete_workload(&manifests::workload_name(username)).await;
        let _ = self.cluster.delete_endpoint(&manifests::endpoint_name(username)).await;
        let _ = self.cluster.delete_config_object(&manifests::config_object_name(username)).await;
        let _ = self.cluster.delete_config_object(&manifests::soul_object_name(username)).await;
    }

    /// Restart deletes only the workload, relying on the orchestrator's
    /// `restartPolicy: Always` to recreate it against the still-live
    /// configuration objects and endpoint. See DESIGN.md Open Question
    /// (a) for why this is deliberate, not a missing feature.
    #[instrument(skip(self))]
    pub async fn restart(&self, username: &str) -> GatewayResult<()> {
        let tenants = self.registry.load().await?;
        if !tenants.contains_key(username) {
            return Err(GatewayError::NotFound(username.to_string()));
        }
        self.cluster.delete_workload(&manifests::workload_name(username)).await?;
        Ok(())
    }

    #[instrument(skip(self, patch))]
    pub async fn patch(
        &self,
        username: &str,
        patch: &crate::domain::requests::UpdateConfigRequest,
    ) -> GatewayResult<TenantRecord> {
        patch.validate()?;

        let mut tenants = self.registry.load().await?;
        let record = tenants.get_mut(username).ok_or_else(|| GatewayError::NotFound(username.to_string()))?;

        // Read the live configuration object and mutate only the
        // recognized fields in place; falls back to an empty object if
        // the object cannot be read (orphaned registry entry).
        let mut config: serde_json::Value = self
            .cluster
            .read_config_object(&manifests::config_object_name(username))
            .await?
            .unwrap_or_else(|| serde_json::json!({}));

        if let Some(model) = &patch.model {
            config["llm_model"] = serde_json::json!(model);
            record.model = model.clone();
        }
        if let Some(api_key) = &patch.api_key {
            // Never mirrored into the registry record.
            config["llm_api_key"] = serde_json::json!(api_key);
        }
        if let Some(provider) = &patch.llm_provider {
            config["llm_provider"] = serde_json::json!(provider);
            config["llm_api_url"] = serde_json::json!(provider_endpoint(provider));
            record.llm_provider = provider.clone();
        }
        if let Some(budget) = patch.token_budget {
            config["seazero_budget"] = serde_json::json!(budget);
            record.token_budget = budget;
        }
        if let Some(enabled) = patch.enable_agent_zero {
            config["seazero_enabled"] = serde_json::json!(enabled);
            record.enable_agent_zero = enabled;
        }
        if let Some(swarm_mode) = patch.swarm_mode {
            config["swarm_mode"] = serde_json::json!(swarm_mode);
            record.swarm_mode = Some(swarm_mode);
        }

        self.cluster
            .create_or_replace_config_object(
                &manifests::config_object_name(username),
                manifests::text_config_object(
                    &manifests::config_object_name(username),
                    "config.json",
                    &serde_json::to_string(&config)?,
                ),
            )
            .await?;

        record.updated_at = Some(chrono::Utc::now());
        let updated = record.clone();
        self.registry.save(tenants).await?;
        Ok(updated)
    }

    pub async fn get(&self, username: &str) -> GatewayResult<TenantRecord> {
        let tenants = self.registry.load().await?;
        tenants.get(username).cloned().ok_or_else(|| GatewayError::NotFound(username.to_string()))
    }

    pub async fn list(&self) -> GatewayResult<Vec<TenantRecord>> {
        let tenants = self.registry.load().await?;
        Ok(tenants.into_values().collect())
    }

    /// Derive the `"running"`/lowercased-phase/`"unknown"` status string
    /// from a live workload status read.
    pub async fn live_status(&self, username: &str) -> GatewayResult<String> {
        let status = self.cluster.read_workload_status(&manifests::workload_name(username)).await?;
        Ok(match status {
            Some(s) if s.ready => "running".to_string(),
            Some(s) => s.phase.map(|p| p.to_lowercase()).unwrap_or_else(|| "unknown".to_string()),
            None => "unknown".to_string(),
        })
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<dyn TenantRegistry> {
        &self.registry
    }

    pub fn cluster(&self) -> &Arc<dyn ClusterClient> {
        &self.cluster
    }
}
