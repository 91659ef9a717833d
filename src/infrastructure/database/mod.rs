//! Database infrastructure: SQLite-backed Plan Tracker Store.
//!
//! - Connection pool management (WAL mode, bounded pool size)
//! - Idempotent schema creation and seeding
//! - Dynamic filtered queries

pub mod connection;
pub mod plan_tracker_repo;

pub use connection::DatabaseConnection;
pub use plan_tracker_repo::SqlitePlanTrackerStore;
