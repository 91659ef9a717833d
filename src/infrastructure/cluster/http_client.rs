//! HTTP-backed `ClusterClient`: the only place in the gateway that
//! knows the orchestrator's wire shapes. Every other component sees
//! only the eight verbs declared in `domain::ports::ClusterClient`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::ports::{ClusterClient, WorkloadStatus};

/// Talks to the container orchestrator's namespaced REST API.
pub struct HttpClusterClient {
    http: reqwest::Client,
    base_url: String,
    namespace: String,
}

impl HttpClusterClient {
    /// Build a client talking to the orchestrator at `base_url`.
    ///
    /// `bearer_token`, when present, is sent as an `Authorization:
    /// Bearer <token>` header on every request — the in-cluster service
    /// account credential pattern. `ca_cert_pem`, when present, is
    /// trusted in addition to the system root store, for orchestrators
    /// behind a self-signed or cluster-internal CA.
    pub fn new(
        base_url: String,
        namespace: String,
        timeout: Duration,
        bearer_token: Option<String>,
        ca_cert_pem: Option<Vec<u8>>,
    ) -> GatewayResult<Self> {
        let mut builder = reqwest::Client::builder().timeout(timeout);

        if let Some(token) = bearer_token {
            let mut headers = reqwest::header::HeaderMap::new();
            let mut value = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| GatewayError::TransientFailure(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        if let Some(pem) = ca_cert_pem {
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| GatewayError::TransientFailure(e.to_string()))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder.build().map_err(|e| GatewayError::TransientFailure(e.to_string()))?;
        Ok(Self { http, base_url, namespace })
    }

    fn configmaps_url(&self) -> String {
        format!("{}/api/v1/namespaces/{}/configmaps", self.base_url, self.namespace)
    }

    fn configmap_url(&self, name: &str) -> String {
        format!("{}/{}", self.configmaps_url(), name)
    }

    fn pods_url(&self) -> String {
        format!("{}/api/v1/namespaces/{}/pods", self.base_url, self.namespace)
    }

    fn pod_url(&self, name: &str) -> String {
        format!("{}/{}", self.pods_url(), name)
    }

    fn services_url(&self) -> String {
        format!("{}/api/v1/namespaces/{}/services", self.base_url, self.namespace)
    }

    fn service_url(&self, name: &str) -> String {
        format!("{}/{}", self.services_url(), name)
    }

    async fn map_response(resp: reqwest::Response, name: &str) -> GatewayResult<reqwest::Response> {
        match resp.status() {
            status if status.is_success() => Ok(resp),
            reqwest::StatusCode::CONFLICT => Err(GatewayError::Conflict(name.to_string())),
            reqwest::StatusCode::NOT_FOUND => Err(GatewayError::NotFound(name.to_string())),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(GatewayError::TransientFailure(format!("orchestrator returned {status}: {body}")))
            }
        }
    }
}

#[async_trait]
impl ClusterClient for HttpClusterClient {
    async fn create_or_replace_config_object(&self, name: &str, data: Value) -> GatewayResult<()> {
        let resp = self
            .http
            .post(self.configmaps_url())
            .json(&data)
            .send()
            .await
            .map_err(|e| GatewayError::TransientFailure(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::CONFLICT {
            let resp = self
                .http
                .put(self.configmap_url(name))
                .json(&data)
                .send()
                .await
                .map_err(|e| GatewayError::TransientFailure(e.to_string()))?;
            Self::map_response(resp, name).await?;
            return Ok(());
        }
        Self::map_response(resp, name).await?;
        Ok(())
    }

    async fn read_config_object(&self, name: &str) -> GatewayResult<Option<Value>> {
        let resp = self
            .http
            .get(self.configmap_url(name))
            .send()
            .await
            .map_err(|e| GatewayError::TransientFailure(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Ok(None);
        }

        let body: Value = resp.json().await.map_err(|e| GatewayError::TransientFailure(e.to_string()))?;
        let raw = body.pointer("/data/config.json").and_then(Value::as_str);
        match raw {
            Some(text) => {
                let parsed: Value = serde_json::from_str(text).map_err(|e| GatewayError::TransientFailure(e.to_string()))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    async fn delete_config_object(&self, name: &str) -> GatewayResult<()> {
        let resp = self
            .http
            .delete(self.configmap_url(name))
            .send()
            .await
            .map_err(|e| GatewayError::TransientFailure(e.to_string()))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND || resp.status().is_success() {
            return Ok(());
        }
        warn!(name, status = %resp.status(), "failed to delete config object, tolerating");
        Ok(())
    }

    async fn create_workload(&self, name: &str, manifest: Value) -> GatewayResult<()> {
        let resp = self
            .http
            .post(self.pods_url())
            .json(&manifest)
            .send()
            .await
            .map_err(|e| GatewayError::TransientFailure(e.to_string()))?;
        Self::map_response(resp, name).await?;
        Ok(())
    }

    async fn delete_workload(&self, name: &str) -> GatewayResult<()> {
        let resp = self
            .http
            .delete(self.pod_url(name))
            .send()
            .await
            .map_err(|e| GatewayError::TransientFailure(e.to_string()))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND || resp.status().is_success() {
            return Ok(());
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(GatewayError::TransientFailure(format!("failed to delete workload '{name}': {status}: {body}")))
    }

    async fn create_or_replace_endpoint(&self, name: &str, manifest: Value) -> GatewayResult<()> {
        let resp = self
            .http
            .post(self.services_url())
            .json(&manifest)
            .send()
            .await
            .map_err(|e| GatewayError::TransientFailure(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::CONFLICT {
            // Endpoint name collisions are tolerated: the tenant's
            // Service already exists and needs no replacement for our
            // purposes.
            return Ok(());
        }
        if !resp.status().is_success() {
            warn!(name, status = %resp.status(), "failed to create endpoint object, tolerating");
        }
        Ok(())
    }

    async fn delete_endpoint(&self, name: &str) -> GatewayResult<()> {
        let resp = self.http.delete(self.service_url(name)).send().await;
        if let Err(e) = resp {
            warn!(name, error = %e, "failed to delete endpoint, tolerating");
        }
        Ok(())
    }

    async fn read_workload_status(&self, name: &str) -> GatewayResult<Option<WorkloadStatus>> {
        let resp = self
            .http
            .get(self.pod_url(name))
            .send()
            .await
            .map_err(|e| GatewayError::TransientFailure(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Ok(None);
        }

        let body: Value = resp.json().await.map_err(|e| GatewayError::TransientFailure(e.to_string()))?;
        let phase = body
            .pointer("/status/phase")
            .and_then(Value::as_str)
            .map(std::string::ToString::to_string);
        let ready = body
            .pointer("/status/containerStatuses")
            .and_then(Value::as_array)
            .map(|statuses| !statuses.is_empty() && statuses.iter().all(|c| c.get("ready").and_then(Value::as_bool).unwrap_or(false)))
            .unwrap_or(false);
        let address = body.pointer("/status/podIP").and_then(Value::as_str).map(std::string::ToString::to_string);

        Ok(Some(WorkloadStatus { phase, ready, address }))
    }
}
