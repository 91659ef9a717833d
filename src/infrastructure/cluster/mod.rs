//! Cluster Client Facade: the narrow boundary between the gateway and
//! the container orchestrator.

pub mod http_client;
pub mod manifests;

pub use http_client::HttpClusterClient;
