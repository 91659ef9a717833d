//! File-backed implementation of `TenantRegistry`.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::errors::GatewayResult;
use crate::domain::models::TenantMap;
use crate::domain::ports::TenantRegistry;

/// Persists the tenant map at a fixed path, rewriting the whole
/// document on every save via a write-temp-then-rename so that a
/// concurrent reader never observes a partially written file.
///
/// The original platform implementation this gateway supersedes wrote
/// this file in place with no temporary-file step; this implementation
/// closes that gap, since partial writes here would corrupt every
/// tenant's record, not just the one being mutated.
pub struct FileTenantRegistry {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTenantRegistry {
    pub fn new(path: PathBuf) -> Self {
        Self { path, lock: Mutex::new(()) }
    }
}

#[async_trait]
impl TenantRegistry for FileTenantRegistry {
    async fn load(&self) -> GatewayResult<TenantMap> {
        let _guard = self.lock.lock().await;
        load_unlocked(&self.path).await
    }

    async fn save(&self, tenants: TenantMap) -> GatewayResult<()> {
        let _guard = self.lock.lock().await;
        save_unlocked(&self.path, &tenants).await
    }
}

async fn load_unlocked(path: &PathBuf) -> GatewayResult<TenantMap> {
    let path = path.clone();
    tokio::task::spawn_blocking(move || -> GatewayResult<TenantMap> {
        if !path.exists() {
            return Ok(TenantMap::new());
        }
        let contents = std::fs::read_to_string(&path)?;
        if contents.trim().is_empty() {
            return Ok(TenantMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    })
    .await
    .map_err(|e| crate::domain::errors::GatewayError::TransientFailure(e.to_string()))?
}

async fn save_unlocked(path: &PathBuf, tenants: &TenantMap) -> GatewayResult<()> {
    let path = path.clone();
    let serialized = serde_json::to_string_pretty(tenants)?;
    tokio::task::spawn_blocking(move || -> GatewayResult<()> {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        std::fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(serialized.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| std::io::Error::other(e.to_string()))?;
        Ok(())
    })
    .await
    .map_err(|e| crate::domain::errors::GatewayError::TransientFailure(e.to_string()))?
}
