//! Tenant Registry: a single JSON document persisted with true
//! write-temp-then-rename atomic semantics, guarded by one in-process
//! mutex.

pub mod file_store;

pub use file_store::FileTenantRegistry;
