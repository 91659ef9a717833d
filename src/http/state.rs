//! Shared application state handed to every route handler.

use std::sync::Arc;

use crate::domain::ports::PlanTrackerStore;
use crate::infrastructure::config::GatewaySettings;
use crate::services::{InstanceOrchestrator, RelayService, SwarmController};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<InstanceOrchestrator>,
    pub relay: Arc<RelayService>,
    pub swarm: Arc<SwarmController>,
    pub plan_tracker: Arc<dyn PlanTrackerStore>,
    pub settings: GatewaySettings,
}
