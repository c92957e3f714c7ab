//! TaskStore: the cache/persistence boundary for the hydrofind pipeline.
//! Defines the `TaskStoreClient` trait plus a Redis-backed implementation
//! and an in-memory test double.

pub mod keys;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use memory::InMemoryTaskStore;
pub use redis_store::RedisTaskStore;
pub use store::{HealthStatus, Namespace, TaskStoreClient};
