//! Command-line entry point for the gateway binary.
//!
//! Deliberately narrow: the gateway is a long-running HTTP service
//! configured primarily through environment variables (`NAMESPACE`,
//! `SEACLAW_IMAGE`, `MAX_INSTANCES`, `DATA_DIR`, `LOG_LEVEL`, …, see
//! `infrastructure::config`); these flags exist only for local
//! development convenience and one-off maintenance tasks.

use std::path::PathBuf;

use clap::Parser;

/// SeaClaw platform control-plane gateway.
#[derive(Debug, Parser)]
#[command(name = "seaclaw-gateway", version, about = "Control-plane gateway for the SeaClaw multi-tenant agent hosting platform")]
pub struct Cli {
    /// Path to an optional YAML config file layered beneath environment
    /// variables.
    #[arg(long, env = "GATEWAY_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Socket address to bind the HTTP server to, overriding `BIND_ADDR`.
    #[arg(long)]
    pub bind_addr: Option<String>,

    /// Seed the Plan Tracker Store and exit without starting the HTTP
    /// server. Useful for provisioning `platform_tasks.db` ahead of a
    /// rollout.
    #[arg(long, default_value_t = false)]
    pub seed_only: bool,

    /// Emit `pretty` logs instead of the configured default (useful
    /// when running the gateway directly in a terminal).
    #[arg(long, default_value_t = false)]
    pub pretty_logs: bool,
}
