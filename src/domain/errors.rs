//! Domain-level errors for the SeaClaw gateway.

use thiserror::Error;

/// Errors raised anywhere in the gateway's domain and service layers.
///
/// Every variant maps 1:1 onto an HTTP status code at the API surface
/// (`src/http/error.rs`); this enum itself stays free of any HTTP types
/// so it can be used from infrastructure code that never sees axum.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("agent '{0}' not found")]
    NotFound(String),

    #[error("agent '{0}' is not authorized to relay to '{1}'")]
    Forbidden(String, String),

    #[error("agent '{0}' already exists")]
    Conflict(String),

    #[error("agent '{0}' not reachable: {1}")]
    ServiceUnavailable(String, String),

    #[error("agent '{0}' did not respond in time")]
    GatewayTimeout(String),

    /// A non-2xx response from a tenant workload, carrying the
    /// workload's own status code and body verbatim. Kept as a plain
    /// `u16` rather than an HTTP-library type so this enum stays free
    /// of HTTP types; `src/http/error.rs` turns it back into a status.
    #[error("upstream returned {0}: {1}")]
    Upstream(u16, String),

    #[error("{0}")]
    TransientFailure(String),
}

/// Convenience alias used throughout the gateway.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        GatewayError::TransientFailure(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::TransientFailure(err.to_string())
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::TransientFailure(err.to_string())
    }
}
