//! Relay: synchronous HTTP hand-off of chat messages and task queries
//! to a tenant's running workload.

use std::time::Duration;

use serde_json::Value;

use crate::domain::errors::{GatewayError, GatewayResult};

/// Absolute timeout for a chat relay call. Deliberately much longer
/// than any other orchestrator call since it may involve an LLM round
/// trip inside the workload.
pub const CHAT_RELAY_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for the structured task-listing relay, which is a direct
/// data fetch rather than an LLM round trip.
pub const TASK_RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends chat messages and task queries to tenant workloads over the
/// cluster-DNS address the Cluster Client Facade derives.
#[derive(Clone)]
pub struct RelayClient {
    http: reqwest::Client,
}

impl Default for RelayClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayClient {
    pub fn new() -> Self {
        Self { http: reqwest::Client::new() }
    }

    /// POST `{message}` to `url` with the fixed 120s chat relay
    /// timeout, mapping transport failures to the distilled spec's
    /// exact taxonomy: connection failure → `ServiceUnavailable`,
    /// timeout → `GatewayTimeout`, non-2xx → `GatewayError::Upstream`
    /// carrying the workload's own status and body verbatim.
    pub async fn send_chat(&self, username: &str, url: &str, message: &str) -> GatewayResult<Value> {
        let resp = self
            .http
            .post(url)
            .timeout(CHAT_RELAY_TIMEOUT)
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await
            .map_err(|e| map_transport_error(username, &e))?;

        if resp.status().is_success() {
            resp.json::<Value>().await.map_err(|e| GatewayError::TransientFailure(e.to_string()))
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(GatewayError::Upstream(status, body))
        }
    }

    /// GET the tenant's task list with an optional `status` filter.
    /// Degrades gracefully rather than failing the whole request: a
    /// 404 maps to an empty list with an explanatory note, and a
    /// connection failure maps to an empty list with an error note —
    /// both are returned as `Ok` values, not propagated errors.
    pub async fn fetch_tasks(&self, url: &str, status: Option<&str>) -> GatewayResult<Value> {
        let mut request = self.http.get(url).timeout(TASK_RELAY_TIMEOUT);
        if let Some(status) = status {
            request = request.query(&[("status", status)]);
        }

        let resp = match request.send().await {
            Ok(resp) => resp,
            Err(e) if e.is_connect() => {
                return Ok(serde_json::json!({ "tasks": [], "error": format!("agent not reachable: {e}") }));
            }
            Err(_) => return Ok(serde_json::json!({ "tasks": [] })),
        };

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(serde_json::json!({
                "tasks": [],
                "note": "Tasks endpoint not yet available in this SeaClaw build"
            }));
        }
        if !resp.status().is_success() {
            return Ok(serde_json::json!({ "tasks": [] }));
        }

        resp.json::<Value>().await.map_err(|e| GatewayError::TransientFailure(e.to_string()))
    }
}

fn map_transport_error(username: &str, err: &reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::GatewayTimeout(username.to_string())
    } else if err.is_connect() {
        GatewayError::ServiceUnavailable(username.to_string(), "not reachable".to_string())
    } else {
        GatewayError::TransientFailure(err.to_string())
    }
}

/// Sanitize a project name: map every character outside
/// `[A-Za-z0-9_-]` to `-`, then truncate to 64 bytes.
pub fn sanitize_project_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '-' })
        .collect();
    sanitized.chars().take(64).collect()
}

/// Derive a project name from a repository URL per the distilled
/// spec's rule: strip a trailing slash, then a trailing `.git` suffix,
/// and take the final path segment.
pub fn project_name_from_repo_url(repo_url: &str) -> String {
    let trimmed = repo_url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    sanitize_project_name(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_disallowed_characters() {
        assert_eq!(sanitize_project_name("my project!!"), "my-project--");
    }

    #[test]
    fn truncates_to_64_bytes() {
        let long = "a".repeat(100);
        assert_eq!(sanitize_project_name(&long).len(), 64);
    }

    #[test]
    fn derives_name_from_repo_url() {
        assert_eq!(project_name_from_repo_url("https://github.com/acme/widgets.git"), "widgets");
        assert_eq!(project_name_from_repo_url("https://github.com/acme/widgets/"), "widgets");
        assert_eq!(project_name_from_repo_url("https://github.com/acme/widgets"), "widgets");
    }

    #[tokio::test]
    async fn non_2xx_chat_response_surfaces_its_own_status_and_body() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = RelayClient::new();
        let url = format!("{}/api/chat", server.uri());
        let err = client.send_chat("erin", &url, "hello").await.unwrap_err();

        match err {
            GatewayError::Upstream(status, body) => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }
}
