//! hydrofind: an async task pipeline for natural-language hydraulic
//! component search. A query or a batch of queries is
//! submitted over HTTP, classified and parameter-extracted by an LLM oracle,
//! matched against a catalog database, cached, and made available as a task
//! the caller polls to completion and can download as a spreadsheet.
//!
//! The pipeline is split into independently deployable crates rather than
//! one binary:
//!
//! - [`hydrofind_shared`] — types, configuration, error taxonomy, fingerprint
//! - [`hydrofind_store`] — the TaskStore (Redis-backed task/cache state)
//! - [`hydrofind_broker`] — the RabbitMQ work queue
//! - [`hydrofind_llm`] — the LLMGateway oracle client
//! - [`hydrofind_catalog`] — the catalog database adapter
//! - [`hydrofind_artifact`] — spreadsheet rendering
//! - [`hydrofind_worker`] — the consumer process (`hydrofind-worker` binary)
//! - [`hydrofind_api`] — the Producer/StatusAPI HTTP surface (`hydrofind-api`
//!   binary)
//!
//! This crate re-exports them for integration tests and downstream
//! consumers that want the whole pipeline in one dependency.

pub use hydrofind_api as api;
pub use hydrofind_artifact as artifact;
pub use hydrofind_broker as broker;
pub use hydrofind_catalog as catalog;
pub use hydrofind_llm as llm;
pub use hydrofind_shared as shared;
pub use hydrofind_store as store;
pub use hydrofind_worker as worker;
