//! In-memory `TaskStoreClient` test double: an exercised, non-I/O stand-in
//! used throughout the worker/api test suites instead of a live Redis
//! connection.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use hydrofind_shared::{HydroError, HydroResult, SingleResult, Task};

use crate::keys;
use crate::store::{HealthStatus, TaskStoreClient};

const TASK_TTL_EXTENSION_SECS: u64 = 300;
const SEARCH_TTL_EXTENSION_SECS: u64 = 60;

struct Entry {
    payload: String,
    expires_at: Instant,
    cap_secs: u64,
    extension_secs: u64,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    fn slide(&mut self, now: Instant) {
        let remaining = self.expires_at.saturating_duration_since(now);
        let extended = remaining + Duration::from_secs(self.extension_secs);
        let capped = extended.min(Duration::from_secs(self.cap_secs));
        self.expires_at = now + capped;
    }
}

pub struct InMemoryTaskStore {
    entries: Mutex<HashMap<String, Entry>>,
    task_ttl_secs: u64,
    search_cache_ttl_secs: u64,
    artifact_ttl_secs: u64,
}

impl InMemoryTaskStore {
    pub fn new(task_ttl_secs: u64, search_cache_ttl_secs: u64, artifact_ttl_secs: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            task_ttl_secs,
            search_cache_ttl_secs,
            artifact_ttl_secs,
        }
    }

    fn put(&self, key: String, payload: String, ttl_secs: u64, extension_secs: u64) {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("task store mutex poisoned");
        entries.insert(
            key,
            Entry {
                payload,
                expires_at: now + Duration::from_secs(ttl_secs),
                cap_secs: ttl_secs,
                extension_secs,
            },
        );
    }

    fn get(&self, key: &str, sliding: bool) -> Option<String> {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("task store mutex poisoned");
        let entry = entries.get_mut(key)?;
        if entry.is_expired(now) {
            entries.remove(key);
            return None;
        }
        if sliding {
            entry.slide(now);
        }
        Some(entry.payload.clone())
    }
}

#[async_trait]
impl TaskStoreClient for InMemoryTaskStore {
    async fn put_task(&self, task: &Task) -> HydroResult<()> {
        let payload = serde_json::to_string(task)?;
        self.put(keys::task_key(&task.task_id), payload, self.task_ttl_secs, TASK_TTL_EXTENSION_SECS);
        Ok(())
    }

    async fn delete_task(&self, task_id: &str) -> HydroResult<()> {
        self.entries.lock().expect("task store mutex poisoned").remove(&keys::task_key(task_id));
        Ok(())
    }

    async fn get_task(&self, task_id: &str) -> HydroResult<Option<Task>> {
        match self.get(&keys::task_key(task_id), true) {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn get_search_cache(&self, fingerprint: &str) -> HydroResult<Option<SingleResult>> {
        match self.get(&keys::search_key(fingerprint), true) {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn put_search_cache(&self, fingerprint: &str, result: &SingleResult) -> HydroResult<()> {
        let payload = serde_json::to_string(result)?;
        self.put(
            keys::search_key(fingerprint),
            payload,
            self.search_cache_ttl_secs,
            SEARCH_TTL_EXTENSION_SECS,
        );
        Ok(())
    }

    async fn put_excel_ref(&self, task_id: &str, reference: &str) -> HydroResult<()> {
        self.put(keys::excel_key(task_id), reference.to_string(), self.artifact_ttl_secs, 0);
        Ok(())
    }

    async fn get_excel_ref(&self, task_id: &str) -> HydroResult<Option<String>> {
        Ok(self.get(&keys::excel_key(task_id), false))
    }

    async fn health_check(&self) -> HydroResult<HealthStatus> {
        let entries = self.entries.lock().map_err(|_| HydroError::Internal("poisoned lock".into()))?;
        Ok(HealthStatus { connected: true, key_count: Some(entries.len() as u64) })
    }

    async fn cleanup_expired(&self) -> HydroResult<usize> {
        let now = Instant::now();
        let mut entries = self.entries.lock().map_err(|_| HydroError::Internal("poisoned lock".into()))?;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrofind_shared::{TaskKind, TaskStatus};

    fn sample_task(id: &str) -> Task {
        Task::new_processing(id.to_string(), TaskKind::Single, "query".to_string(), 5, 0)
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = InMemoryTaskStore::new(3600, 600, 86_400);
        let task = sample_task("t1");
        store.put_task(&task).await.unwrap();
        let fetched = store.get_task("t1").await.unwrap().unwrap();
        assert_eq!(fetched.task_id, "t1");
        assert_eq!(fetched.status, TaskStatus::Processing);
    }

    #[tokio::test]
    async fn delete_task_removes_it() {
        let store = InMemoryTaskStore::new(3600, 600, 86_400);
        store.put_task(&sample_task("t1")).await.unwrap();
        store.delete_task("t1").await.unwrap();
        assert!(store.get_task("t1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_missing_task_returns_none() {
        let store = InMemoryTaskStore::new(3600, 600, 86_400);
        assert!(store.get_task("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn excel_ref_is_not_sliding() {
        let store = InMemoryTaskStore::new(3600, 600, 1);
        store.put_excel_ref("t1", "s3://artifacts/t1.csv").await.unwrap();
        let reference = store.get_excel_ref("t1").await.unwrap();
        assert_eq!(reference.as_deref(), Some("s3://artifacts/t1.csv"));
    }

    #[tokio::test]
    async fn cleanup_expired_removes_nothing_when_all_entries_are_fresh() {
        let store = InMemoryTaskStore::new(3600, 600, 86_400);
        store.put_task(&sample_task("t1")).await.unwrap();
        let removed = store.cleanup_expired().await.unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn health_check_reports_connected_and_key_count() {
        let store = InMemoryTaskStore::new(3600, 600, 86_400);
        store.put_task(&sample_task("t1")).await.unwrap();
        let health = store.health_check().await.unwrap();
        assert!(health.connected);
        assert_eq!(health.key_count, Some(1));
    }
}
