//! SeaClaw Platform Gateway — control plane for a multi-tenant agent
//! hosting platform.
//!
//! Accepts sign-up requests describing a desired tenant agent instance,
//! materializes it as a set of objects on a container orchestrator, and
//! mediates all subsequent interaction (chat relay, configuration
//! mutation, workspace/project management, and ephemeral worker
//! swarms) between external clients and the running per-tenant
//! workloads.

pub mod cli;
pub mod domain;
pub mod http;
pub mod infrastructure;
pub mod services;

pub use infrastructure::config::GatewaySettings;
