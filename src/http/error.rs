//! Maps `GatewayError` onto HTTP responses, 1:1, per the status table.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::errors::GatewayError;

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        // `Upstream` carries the workload's own status and body, which
        // must reach the client verbatim rather than behind the
        // generic "upstream returned ..." wrapper `Display` produces.
        if let GatewayError::Upstream(status, body) = &self {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, Json(json!({ "error": body }))).into_response();
        }

        let status = match &self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Forbidden(_, _) => StatusCode::FORBIDDEN,
            GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::ServiceUnavailable(_, _) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Upstream(_, _) => unreachable!("handled above"),
            GatewayError::TransientFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    #[tokio::test]
    async fn upstream_error_keeps_the_workloads_own_status_and_body() {
        let response = GatewayError::Upstream(429, "rate limited".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "rate limited");
    }
}
