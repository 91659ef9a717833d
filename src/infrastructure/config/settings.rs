//! The gateway's settings struct, extracted from figment.

use serde::{Deserialize, Serialize};

/// All runtime configuration for the gateway process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GatewaySettings {
    /// Kubernetes-style namespace the platform and its tenants live in.
    pub namespace: String,
    /// Container image reference used for every tenant workload.
    pub seaclaw_image: String,
    /// Maximum number of tenant records the registry accepts at
    /// creation time.
    pub max_instances: usize,
    /// Directory backing `instances.json` and `platform_tasks.db`.
    pub data_dir: String,
    /// Directory of persona documents, looked up as
    /// `<persona_dir>/<soul>.md`. A missing file falls back to the
    /// generic single-line persona text.
    pub persona_dir: String,
    /// `tracing` filter directive, e.g. `info` or `debug`.
    pub log_level: String,
    /// `json` or `pretty`.
    pub log_format: String,
    /// Socket address the HTTP server binds.
    pub bind_addr: String,
    /// Port exposed by every tenant workload.
    pub agent_port: u16,
    /// Per-call timeout applied to Cluster Client Facade calls other
    /// than the chat relay (which has its own fixed 120s timeout).
    pub request_timeout_secs: u64,
    /// Base URL of the container orchestrator's API server.
    pub orchestrator_base_url: String,
    /// Path to a bearer token presented on every orchestrator call
    /// (e.g. the in-cluster service account token). `None` disables
    /// bearer authentication, for local/standalone orchestrator stubs.
    pub orchestrator_token_path: Option<String>,
    /// Path to an additional CA certificate (PEM) trusted for the
    /// orchestrator connection, beyond the system trust store.
    pub orchestrator_ca_cert_path: Option<String>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            namespace: "seaclaw-platform".to_string(),
            seaclaw_image: "seaclaw-instance:latest".to_string(),
            max_instances: 5,
            data_dir: "/data/platform".to_string(),
            persona_dir: "/data/platform/souls".to_string(),
            log_level: "info".to_string(),
            log_format: "json".to_string(),
            bind_addr: "0.0.0.0:8090".to_string(),
            agent_port: 8899,
            request_timeout_secs: 30,
            orchestrator_base_url: "https://kubernetes.default.svc".to_string(),
            orchestrator_token_path: Some("/var/run/secrets/kubernetes.io/serviceaccount/token".to_string()),
            orchestrator_ca_cert_path: Some("/var/run/secrets/kubernetes.io/serviceaccount/ca.crt".to_string()),
        }
    }
}

impl GatewaySettings {
    pub fn instances_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join("instances.json")
    }

    pub fn tasks_db_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join("platform_tasks.db")
    }
}
