//! Shared types, configuration, error handling, and cross-cutting utilities
//! for the hydrofind pipeline (Producer, Worker, StatusAPI).

pub mod config;
pub mod error;
pub mod extracted;
pub mod fingerprint;
pub mod logging;
pub mod retry;
pub mod types;

pub use config::HydroConfig;
pub use error::{ErrorKind, HydroError, HydroResult};
pub use extracted::ExtractedData;
pub use types::{
    AiResultSummary, BatchItemResult, BatchResult, CatalogMatch, ComponentType, ResultSource,
    SingleResult, Task, TaskError, TaskKind, TaskResult, TaskStatus,
};
