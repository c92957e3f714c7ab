//! Shared, request-parallel-safe application state: handlers are stateless
//! except for these lazily-initialized connection holders.

use hydrofind_broker::Broker;
use hydrofind_store::TaskStoreClient;

pub struct AppState {
    pub broker: Broker,
    pub store: Box<dyn TaskStoreClient>,
    pub cache_short_circuit_enabled: bool,
    /// Age (seconds) past which a `processing` task is reclaimed to
    /// `timeout` on read.
    pub reclaim_after_secs: i64,
}
