//! Logging infrastructure.
//!
//! Structured logging using `tracing` and `tracing-subscriber`: an
//! `EnvFilter` seeded from the configured log level, and a choice of
//! JSON or pretty formatting for local development. Request-level
//! spans are added at the HTTP layer via `tower_http::trace`, not
//! here — this module only installs the global subscriber.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. Must be called once, before
/// any other part of the gateway emits a log line.
pub fn init(log_level: &str, log_format: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.pretty().init();
    }
}
