//! Service layer for the SeaClaw gateway: the Instance Orchestrator,
//! Relay, and Swarm Controller, each composed from the port traits in
//! `domain::ports`.

pub mod orchestrator;
pub mod relay_service;
pub mod swarm;

pub use orchestrator::InstanceOrchestrator;
pub use relay_service::RelayService;
pub use swarm::SwarmController;
