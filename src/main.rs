//! SeaClaw Platform Gateway entry point.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use seaclaw_gateway::cli::Cli;
use seaclaw_gateway::domain::ports::{PlanTrackerStore, TenantRegistry};
use seaclaw_gateway::http::{self, AppState};
use seaclaw_gateway::infrastructure::cluster::HttpClusterClient;
use seaclaw_gateway::infrastructure::config::{ConfigLoader, GatewaySettings};
use seaclaw_gateway::infrastructure::database::{DatabaseConnection, SqlitePlanTrackerStore};
use seaclaw_gateway::infrastructure::logging;
use seaclaw_gateway::infrastructure::registry::FileTenantRegistry;
use seaclaw_gateway::infrastructure::relay::RelayClient;
use seaclaw_gateway::services::{InstanceOrchestrator, RelayService, SwarmController};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path).context("failed to load gateway configuration")?,
        None => ConfigLoader::load().context("failed to load gateway configuration")?,
    };
    if let Some(bind_addr) = &cli.bind_addr {
        settings.bind_addr = bind_addr.clone();
    }
    if cli.pretty_logs {
        settings.log_format = "pretty".to_string();
    }
    ConfigLoader::validate(&settings).context("invalid gateway configuration")?;

    logging::init(&settings.log_level, &settings.log_format);
    info!(namespace = %settings.namespace, data_dir = %settings.data_dir, "starting seaclaw-gateway");

    let plan_tracker: Arc<dyn PlanTrackerStore> = Arc::new(build_plan_tracker(&settings).await?);
    plan_tracker.seed().await.context("failed to seed platform_tasks.db")?;

    if cli.seed_only {
        info!("plan tracker store seeded, exiting (--seed-only)");
        return Ok(());
    }

    let registry: Arc<dyn TenantRegistry> = Arc::new(FileTenantRegistry::new(settings.instances_path()));
    // Touch the registry once at boot so a brand-new `instances.json` exists
    // before the first request, matching the platform's existing behavior
    // of tolerating a missing file by treating it as an empty registry.
    let _ = registry.load().await?;

    let cluster = Arc::new(build_cluster_client(&settings)?);
    let orchestrator = Arc::new(InstanceOrchestrator::new(cluster.clone(), registry.clone(), settings.clone()));
    let relay_service = Arc::new(RelayService::new(RelayClient::new(), registry.clone(), settings.clone()));
    let swarm = Arc::new(SwarmController::new(orchestrator.clone(), cluster, registry, settings.clone()));

    let state = AppState { orchestrator, relay: relay_service, swarm, plan_tracker, settings: settings.clone() };

    let router = http::build_router(state);
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    info!(addr = %settings.bind_addr, "listening");

    axum::serve(listener, router).await.context("HTTP server exited")?;
    Ok(())
}

async fn build_plan_tracker(settings: &GatewaySettings) -> Result<SqlitePlanTrackerStore> {
    std::fs::create_dir_all(&settings.data_dir).context("failed to create data directory")?;
    let url = format!("sqlite:{}", settings.tasks_db_path().display());
    let db = DatabaseConnection::new(&url).await.context("failed to open platform_tasks.db")?;
    Ok(SqlitePlanTrackerStore::new(db.pool().clone()))
}

fn build_cluster_client(settings: &GatewaySettings) -> Result<HttpClusterClient> {
    let bearer_token = settings
        .orchestrator_token_path
        .as_ref()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .map(|s| s.trim().to_string());

    let ca_cert_pem = settings
        .orchestrator_ca_cert_path
        .as_ref()
        .and_then(|path| std::fs::read(path).ok());

    HttpClusterClient::new(
        settings.orchestrator_base_url.clone(),
        settings.namespace.clone(),
        Duration::from_secs(settings.request_timeout_secs),
        bearer_token,
        ca_cert_pem,
    )
    .context("failed to build orchestrator client")
}
