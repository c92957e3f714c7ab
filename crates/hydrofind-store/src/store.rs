//! TaskStore contract: three key namespaces, sliding vs. non-sliding TTL,
//! best-effort single-key writes, idempotent cleanup sweep, and a
//! liveness/key-count health check.

use async_trait::async_trait;
use hydrofind_shared::{HydroResult, SingleResult, Task};

/// Liveness summary returned by `/api/health`'s `services.cache` field.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub connected: bool,
    pub key_count: Option<u64>,
}

/// The three namespaces a cleanup sweep can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Task,
    Search,
    Excel,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Task => "task",
            Namespace::Search => "search",
            Namespace::Excel => "excel",
        }
    }
}

#[async_trait]
pub trait TaskStoreClient: Send + Sync {
    /// Write the full task envelope under `task:<id>`, resetting its TTL to
    /// the configured task TTL.
    async fn put_task(&self, task: &Task) -> HydroResult<()>;

    /// Remove a task envelope outright. Used only by the Producer's publish
    /// rollback: if the TaskStore write succeeds but publishing the work
    /// message subsequently fails, the Producer removes the just-written
    /// state rather than leaving an orphaned `processing` task behind.
    async fn delete_task(&self, task_id: &str) -> HydroResult<()>;

    /// Read a task envelope, sliding its TTL forward by the configured
    /// read-extension amount (capped at the configured maximum). Returns
    /// `None` if absent or expired.
    async fn get_task(&self, task_id: &str) -> HydroResult<Option<Task>>;

    /// Read a cached search payload under `search:<fingerprint>`, sliding its
    /// TTL forward on hit. Returns `None` on miss.
    async fn get_search_cache(&self, fingerprint: &str) -> HydroResult<Option<SingleResult>>;

    /// Write a search payload under `search:<fingerprint>`, resetting its TTL
    /// to the configured search-cache TTL.
    async fn put_search_cache(&self, fingerprint: &str, result: &SingleResult) -> HydroResult<()>;

    /// Write an artifact reference under `excel:<id>` with a non-sliding TTL.
    async fn put_excel_ref(&self, task_id: &str, reference: &str) -> HydroResult<()>;

    /// Read an artifact reference. Returns `None` if absent or expired.
    async fn get_excel_ref(&self, task_id: &str) -> HydroResult<Option<String>>;

    /// Connection liveness plus an approximate key count, for `/api/health`.
    async fn health_check(&self) -> HydroResult<HealthStatus>;

    /// Idempotent sweep removing entries the backend's own TTL mechanism
    /// hasn't yet reaped (e.g. orphaned index entries). Returns the number
    /// of entries removed. Safe to call repeatedly or concurrently.
    async fn cleanup_expired(&self) -> HydroResult<usize>;
}
