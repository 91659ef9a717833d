//! Infrastructure layer: concrete adapters behind the domain's port
//! traits.
//!
//! - Cluster Client Facade (`cluster`)
//! - Tenant Registry (`registry`)
//! - Plan Tracker Store (`database`)
//! - Relay (`relay`)
//! - Configuration (`config`)
//! - Logging (`logging`)

pub mod cluster;
pub mod config;
pub mod database;
pub mod logging;
pub mod registry;
pub mod relay;
