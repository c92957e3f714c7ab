//! Redis-backed `TaskStoreClient`, following the connection-manager +
//! `AsyncCommands` pattern used by `crates/pmcp-tasks/src/store/redis.rs`.
//! Unlike that backend's CAS hash+Lua layout, hydrofind's three namespaces
//! are single-key string values: operations are single-key and CAS-free
//! (best-effort) — no version tracking, no cross-key atomicity.

use async_trait::async_trait;
use hydrofind_shared::{HydroError, HydroResult, SingleResult, Task};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::keys;
use crate::store::{HealthStatus, TaskStoreClient};

/// Read-time TTL extension for `task:<id>`.
const TASK_TTL_EXTENSION_SECS: i64 = 300;
/// Read-time TTL extension for `search:<fingerprint>`.
const SEARCH_TTL_EXTENSION_SECS: i64 = 60;

#[derive(Clone)]
pub struct RedisTaskStore {
    conn: ConnectionManager,
    task_ttl_secs: u64,
    search_cache_ttl_secs: u64,
    artifact_ttl_secs: u64,
}

impl RedisTaskStore {
    pub async fn connect(
        redis_url: &str,
        task_ttl_secs: u64,
        search_cache_ttl_secs: u64,
        artifact_ttl_secs: u64,
    ) -> HydroResult<Self> {
        let client = redis::Client::open(redis_url).map_err(|e| HydroError::Redis(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| HydroError::Redis(e.to_string()))?;
        Ok(Self {
            conn,
            task_ttl_secs,
            search_cache_ttl_secs,
            artifact_ttl_secs,
        })
    }

    /// Extend `key`'s TTL by `extension`, capped at `cap`, based on its
    /// remaining TTL right now. No-op if the key has no TTL or is missing.
    async fn slide_ttl(&self, key: &str, extension: i64, cap: u64) -> HydroResult<()> {
        let mut conn = self.conn.clone();
        let current: i64 = conn.ttl(key).await.map_err(|e| HydroError::Redis(e.to_string()))?;
        if current < 0 {
            // -1: no TTL set, -2: key missing. Neither should be extended.
            return Ok(());
        }
        let new_ttl = (current + extension).min(cap as i64).max(1);
        let _: () = conn
            .expire(key, new_ttl)
            .await
            .map_err(|e| HydroError::Redis(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl TaskStoreClient for RedisTaskStore {
    async fn put_task(&self, task: &Task) -> HydroResult<()> {
        let mut conn = self.conn.clone();
        let key = keys::task_key(&task.task_id);
        let payload = serde_json::to_string(task)?;
        let _: () = conn
            .set_ex(key, payload, self.task_ttl_secs)
            .await
            .map_err(|e| HydroError::Redis(e.to_string()))?;
        Ok(())
    }

    async fn delete_task(&self, task_id: &str) -> HydroResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(keys::task_key(task_id)).await.map_err(|e| HydroError::Redis(e.to_string()))?;
        Ok(())
    }

    async fn get_task(&self, task_id: &str) -> HydroResult<Option<Task>> {
        let key = keys::task_key(task_id);
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(&key).await.map_err(|e| HydroError::Redis(e.to_string()))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        self.slide_ttl(&key, TASK_TTL_EXTENSION_SECS, self.task_ttl_secs).await?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    async fn get_search_cache(&self, fingerprint: &str) -> HydroResult<Option<SingleResult>> {
        let key = keys::search_key(fingerprint);
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(&key).await.map_err(|e| HydroError::Redis(e.to_string()))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        self.slide_ttl(&key, SEARCH_TTL_EXTENSION_SECS, self.search_cache_ttl_secs)
            .await?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    async fn put_search_cache(&self, fingerprint: &str, result: &SingleResult) -> HydroResult<()> {
        let key = keys::search_key(fingerprint);
        let payload = serde_json::to_string(result)?;
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(key, payload, self.search_cache_ttl_secs)
            .await
            .map_err(|e| HydroError::Redis(e.to_string()))?;
        Ok(())
    }

    async fn put_excel_ref(&self, task_id: &str, reference: &str) -> HydroResult<()> {
        let key = keys::excel_key(task_id);
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(key, reference, self.artifact_ttl_secs)
            .await
            .map_err(|e| HydroError::Redis(e.to_string()))?;
        Ok(())
    }

    async fn get_excel_ref(&self, task_id: &str) -> HydroResult<Option<String>> {
        let key = keys::excel_key(task_id);
        let mut conn = self.conn.clone();
        // Non-sliding: plain GET, no EXPIRE touch.
        conn.get(&key).await.map_err(|e| HydroError::Redis(e.to_string()))
    }

    async fn health_check(&self) -> HydroResult<HealthStatus> {
        let mut conn = self.conn.clone();
        let pong: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        let connected = pong.is_ok();
        let key_count = if connected {
            conn.dbsize().await.ok()
        } else {
            None
        };
        Ok(HealthStatus { connected, key_count })
    }

    async fn cleanup_expired(&self) -> HydroResult<usize> {
        // Redis reaps its own TTLs; hydrofind keeps no secondary index that
        // could go stale, so there is nothing left for an application-level
        // sweep to remove. Kept as an explicit no-op to satisfy the
        // TaskStoreClient contract and mirror the in-memory double's sweep.
        Ok(0)
    }
}
