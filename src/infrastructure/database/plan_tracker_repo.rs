//! Plan Tracker Store: a SQLite-backed ledger of platform build tasks,
//! seeded idempotently and queried/mutated through a narrow interface.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::PlanTask;
use crate::domain::ports::PlanTrackerStore;
use crate::domain::requests::PlanTaskFilter;

pub struct SqlitePlanTrackerStore {
    pool: SqlitePool,
}

impl SqlitePlanTrackerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the table and indexes if they do not already exist.
    pub async fn init_schema(&self) -> GatewayResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS platform_tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                phase TEXT NOT NULL,
                task_id TEXT NOT NULL UNIQUE,
                sprint INTEGER NOT NULL,
                title TEXT NOT NULL,
                effort TEXT NOT NULL CHECK (effort IN ('S', 'M', 'H')),
                status TEXT NOT NULL DEFAULT 'todo' CHECK (status IN ('todo', 'in_progress', 'done', 'blocked')),
                files TEXT,
                notes TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_platform_tasks_phase ON platform_tasks(phase)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_platform_tasks_sprint ON platform_tasks(sprint)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_platform_tasks_status ON platform_tasks(status)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl PlanTrackerStore for SqlitePlanTrackerStore {
    async fn seed(&self) -> GatewayResult<()> {
        self.init_schema().await?;

        for (phase, task_id, sprint, title, effort, files) in seed_tasks() {
            sqlx::query(
                "INSERT OR IGNORE INTO platform_tasks (phase, task_id, sprint, title, effort, files) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(phase)
            .bind(task_id)
            .bind(sprint)
            .bind(title)
            .bind(effort)
            .bind(files)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn list(&self, filter: &PlanTaskFilter) -> GatewayResult<Vec<PlanTask>> {
        let mut query = String::from("SELECT * FROM platform_tasks WHERE 1=1");
        let mut bindings: Vec<String> = Vec::new();

        if let Some(phase) = &filter.phase {
            query.push_str(" AND phase = ?");
            bindings.push(phase.clone());
        }
        if let Some(sprint) = filter.sprint {
            query.push_str(" AND sprint = ?");
            bindings.push(sprint.to_string());
        }
        if let Some(status) = &filter.status {
            query.push_str(" AND status = ?");
            bindings.push(status.clone());
        }
        query.push_str(" ORDER BY phase, task_id");

        let mut q = sqlx::query(&query);
        for binding in &bindings {
            q = q.bind(binding);
        }

        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_task).collect())
    }

    async fn patch(&self, task_id: &str, status: Option<&str>, notes: Option<&str>) -> GatewayResult<()> {
        if status.is_none() && notes.is_none() {
            return Err(GatewayError::Validation("no recognized fields to update".to_string()));
        }

        let mut sets = Vec::new();
        if status.is_some() {
            sets.push("status = ?");
        }
        if notes.is_some() {
            sets.push("notes = ?");
        }
        let query = format!(
            "UPDATE platform_tasks SET {}, updated_at = datetime('now') WHERE task_id = ?",
            sets.join(", ")
        );

        let mut q = sqlx::query(&query);
        if let Some(status) = status {
            q = q.bind(status);
        }
        if let Some(notes) = notes {
            q = q.bind(notes);
        }
        q = q.bind(task_id);

        let result = q.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(GatewayError::NotFound(task_id.to_string()));
        }
        Ok(())
    }
}

fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> PlanTask {
    PlanTask {
        id: row.get("id"),
        phase: row.get("phase"),
        task_id: row.get("task_id"),
        sprint: row.get("sprint"),
        title: row.get("title"),
        effort: row.get("effort"),
        status: row.get("status"),
        files: row.get("files"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// The full seed table: (phase, task_id, sprint, title, effort, files).
#[allow(clippy::too_many_lines)]
fn seed_tasks() -> Vec<(&'static str, &'static str, i64, &'static str, &'static str, Option<&'static str>)> {
    vec![
        // Phase P1 (sprint 1) — Platform Dashboard
        ("P1", "P1-01", 1, "Agent status card on dashboard", "M", None),
        ("P1", "P1-02", 1, "Projects tab on agent detail page", "M", None),
        ("P1", "P1-03", 1, "Project clone endpoint wiring", "M", Some("platform/gateway/main.py")),
        ("P1", "P1-04", 1, "Workspace listing view", "S", None),
        ("P1", "P1-05", 1, "Task board UI", "M", None),
        ("P1", "P1-06", 1, "Task board proxy to workload /api/tasks", "S", Some("platform/gateway/main.py")),
        ("P1", "P1-07", 1, "Agent settings panel", "M", None),
        ("P1", "P1-08", 1, "Agent config patch endpoint wiring", "M", Some("platform/gateway/main.py")),
        ("P1", "P1-09", 1, "Optional Telegram token field on signup", "S", None),
        ("P1", "P1-10", 1, "Swarm mode toggle on settings panel", "S", None),
        // Phase P2 (sprint 2) — Native Git Tools
        ("P2", "P2-01", 2, "tool_git_clone", "M", None),
        ("P2", "P2-02", 2, "tool_git_pull", "S", None),
        ("P2", "P2-03", 2, "tool_git_status", "S", None),
        ("P2", "P2-04", 2, "tool_git_diff", "S", None),
        ("P2", "P2-05", 2, "tool_git_log", "S", None),
        ("P2", "P2-06", 2, "tool_git_checkout", "S", None),
        ("P2", "P2-07", 2, "Register git tools in workload tool table", "M", None),
        ("P2", "P2-08", 2, "Rebuild workload image with git tooling", "M", None),
        ("P2", "P2-09", 2, "End-to-end clone-and-summarize test", "M", None),
        // Phase P3 (sprint 2) — Project Management Tools
        ("P3", "P3-01", 2, "tool_create_task", "M", None),
        ("P3", "P3-02", 2, "tool_update_task", "S", None),
        ("P3", "P3-03", 2, "tool_list_tasks", "S", None),
        ("P3", "P3-04", 2, "tool_generate_report", "M", None),
        ("P3", "P3-05", 2, "tool_set_milestone", "S", None),
        ("P3", "P3-06", 2, "Workload GET /api/tasks endpoint", "M", Some("platform/gateway/main.py")),
        ("P3", "P3-07", 2, "Dashboard Kanban view", "H", None),
        ("P3", "P3-08", 2, "End-to-end task lifecycle test", "M", None),
        // Phase P4 (sprint 3) — Agent Swarm
        ("P4", "P4-01", 3, "tool_spawn_worker", "H", Some("platform/gateway/main.py")),
        ("P4", "P4-02", 3, "Worker pod lifecycle management", "H", Some("platform/gateway/main.py")),
        ("P4", "P4-03", 3, "Worker spawn endpoint wiring", "M", Some("platform/gateway/main.py")),
        ("P4", "P4-04", 3, "Inter-pod relay for coordinator/worker", "M", Some("platform/gateway/main.py")),
        ("P4", "P4-05", 3, "Coordinator prompt template for delegation", "M", None),
        ("P4", "P4-06", 3, "Swarm mode toggle enforcement", "S", Some("platform/gateway/main.py")),
        ("P4", "P4-07", 3, "End-to-end swarm spawn-and-relay test", "M", None),
        // Phase P5 (sprint 4) — Agent Zero / Premium
        ("P5", "P5-01", 4, "Privileged-runtime container image", "H", None),
        ("P5", "P5-02", 4, "Privileged-runtime Kubernetes manifest", "M", None),
        ("P5", "P5-03", 4, "Signup toggle for privileged runtime", "S", None),
        ("P5", "P5-04", 4, "Per-user token budget field", "S", Some("platform/gateway/main.py")),
        ("P5", "P5-05", 4, "Gateway injects bridge URL/token into pod env", "M", Some("platform/gateway/main.py")),
        ("P5", "P5-06", 4, "Multi-tenant budget tracking in LLM proxy", "H", None),
        ("P5", "P5-07", 4, "Dashboard privileged-runtime status indicator", "S", None),
        ("P5", "P5-08", 4, "End-to-end privileged-runtime test", "M", None),
        // Phase P6 (sprint 5) — Multi-Node + Autoscaling
        ("P6", "P6-01", 5, "Node join script", "M", None),
        ("P6", "P6-02", 5, "Node labeling scheme", "S", None),
        ("P6", "P6-03", 5, "Distributed storage provisioning", "H", None),
        ("P6", "P6-04", 5, "Horizontal pod autoscaler for workloads", "M", None),
        ("P6", "P6-05", 5, "Pod disruption budget", "S", None),
        ("P6", "P6-06", 5, "Per-tenant resource requests/limits", "S", Some("platform/gateway/main.py")),
        ("P6", "P6-07", 5, "Namespace resource quota", "S", None),
        ("P6", "P6-08", 5, "Multi-node join end-to-end test", "M", None),
        // Phase P7 (sprint 6) — Multi-Channel
        ("P7", "P7-01", 6, "Discord channel adapter", "H", None),
        ("P7", "P7-02", 6, "Slack channel adapter", "H", None),
        ("P7", "P7-03", 6, "Channel token fields on signup", "S", Some("platform/gateway/main.py")),
        ("P7", "P7-04", 6, "Gateway injects channel tokens into pod env", "M", Some("platform/gateway/main.py")),
        ("P7", "P7-05", 6, "Voice transcription integration", "H", None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::connection::DatabaseConnection;

    async fn setup() -> SqlitePlanTrackerStore {
        let db = DatabaseConnection::new("sqlite::memory:").await.unwrap();
        let store = SqlitePlanTrackerStore::new(db.pool().clone());
        store.seed().await.unwrap();
        store
    }

    #[tokio::test]
    async fn seed_is_idempotent() {
        let store = setup().await;
        store.seed().await.unwrap();
        let all = store.list(&PlanTaskFilter::default()).await.unwrap();
        assert_eq!(all.len(), 55);
    }

    #[tokio::test]
    async fn list_filters_by_phase() {
        let store = setup().await;
        let filter = PlanTaskFilter { phase: Some("P4".to_string()), sprint: None, status: None };
        let tasks = store.list(&filter).await.unwrap();
        assert_eq!(tasks.len(), 7);
        assert!(tasks.iter().all(|t| t.phase == "P4"));
    }

    #[tokio::test]
    async fn list_is_ordered_by_phase_then_task_id() {
        let store = setup().await;
        let tasks = store.list(&PlanTaskFilter::default()).await.unwrap();
        let mut prev = ("", "");
        for t in &tasks {
            let cur = (t.phase.as_str(), t.task_id.as_str());
            assert!(cur >= prev);
            prev = cur;
        }
    }

    #[tokio::test]
    async fn patch_updates_status_and_notes() {
        let store = setup().await;
        store.patch("P1-01", Some("in_progress"), Some("started")).await.unwrap();
        let filter = PlanTaskFilter { phase: None, sprint: None, status: Some("in_progress".to_string()) };
        let tasks = store.list(&filter).await.unwrap();
        let task = tasks.iter().find(|t| t.task_id == "P1-01").unwrap();
        assert_eq!(task.notes.as_deref(), Some("started"));
    }

    #[tokio::test]
    async fn patch_unknown_task_is_not_found() {
        let store = setup().await;
        let result = store.patch("NOPE-99", Some("done"), None).await;
        assert!(matches!(result, Err(GatewayError::NotFound(_))));
    }
}
