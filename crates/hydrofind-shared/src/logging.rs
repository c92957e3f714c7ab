//! # Structured Logging
//!
//! `tracing` initialization shared by the worker and api binaries. Replaces
//! the original service's per-record `task_id` injection (a logging-record
//! factory monkeypatch) with a `tracing` span field set once per message at
//! the top of the pipeline; every event emitted underneath inherits it.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global `tracing` subscriber. Honors `RUST_LOG`, defaulting
/// to `info` when unset. `json` selects structured JSON output (suited to
/// log aggregation); otherwise a human-readable compact format is used.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt().with_env_filter(filter).with_target(true);

    if json {
        subscriber.json().init();
    } else {
        subscriber.compact().init();
    }
}
