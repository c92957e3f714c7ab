//! # Core Task Types
//!
//! Core data model: `Task`, `TaskStatus`, `TaskKind`, `TaskResult`, and the
//! closed `ComponentType` set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The authoritative component-type closed set, unioned from the several
/// slightly divergent declarations of it in the original service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    Fittings,
    Adapters,
    Plugs,
    AdapterTee,
    Banjo,
    BanjoBolt,
    Brs,
    Coupling,
}

impl ComponentType {
    /// Iteration order used for the classify-fallback partial match: the
    /// first matching element by closed-set iteration order wins ties.
    pub const ALL: [ComponentType; 8] = [
        ComponentType::Fittings,
        ComponentType::Adapters,
        ComponentType::Plugs,
        ComponentType::AdapterTee,
        ComponentType::Banjo,
        ComponentType::BanjoBolt,
        ComponentType::Brs,
        ComponentType::Coupling,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Fittings => "fittings",
            ComponentType::Adapters => "adapters",
            ComponentType::Plugs => "plugs",
            ComponentType::AdapterTee => "adapter-tee",
            ComponentType::Banjo => "banjo",
            ComponentType::BanjoBolt => "banjo-bolt",
            ComponentType::Brs => "brs",
            ComponentType::Coupling => "coupling",
        }
    }

    /// Exact (case-insensitive) match against the closed set.
    pub fn parse_exact(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|ct| ct.as_str().eq_ignore_ascii_case(s))
    }

    /// Case-insensitive substring containment in either direction, picking
    /// the first match by closed-set iteration order. Used as the classify
    /// fallback when exact matching fails.
    pub fn parse_fuzzy(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|ct| {
            let hay = ct.as_str();
            hay.contains(needle.as_str()) || needle.contains(hay)
        })
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Single,
    Batch,
}

/// Task status lifecycle: terminal states only leave via reclaim or
/// cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Processing,
    Completed,
    Partial,
    Error,
    Timeout,
    Canceled,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Processing)
    }
}

/// Source of a `TaskResult`, 
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Cache,
    Database,
    AiOnly,
}

/// A single catalog match row, shape left intentionally loose (CatalogAdapter
/// is the opaque-store boundary; concrete columns live in hydrofind-catalog).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogMatch {
    pub article: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// AI extraction summary embedded in a `TaskResult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResultSummary {
    pub component_type: Option<ComponentType>,
    pub extracted_data: serde_json::Value,
}

/// What clients receive for a `single` task, the `Single` variant of
/// `TaskResult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleResult {
    pub query: String,
    pub source: ResultSource,
    pub matches: Vec<CatalogMatch>,
    pub match_count: usize,
    pub ai_result: AiResultSummary,
    pub quantity: Option<u32>,
    pub timestamp: i64,
}

/// A single processed line within a `batch` task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub line: String,
    pub result: Option<SingleResult>,
    pub error: Option<String>,
}

/// What clients receive for a `batch` task, the `Batch` variant of
/// `TaskResult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub results: Vec<BatchItemResult>,
    pub total_items: usize,
    pub processed_items: usize,
    pub timestamp: i64,
}

/// `TaskResult` sum type (single vs. batch; ).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskResult {
    Single(SingleResult),
    Batch(BatchResult),
}

/// A terminal error attached to a task: a human-readable `message` and a
/// machine-readable `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskError {
    pub kind: crate::error::ErrorKind,
    pub message: String,
}

/// Full task envelope, as stored under `task:<id>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub kind: TaskKind,
    pub input: String,
    pub priority: u8,
    pub status: TaskStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub result: Option<TaskResult>,
    pub error: Option<TaskError>,
    pub retry_count: u32,
}

impl Task {
    pub fn new_processing(task_id: String, kind: TaskKind, input: String, priority: u8, now: i64) -> Self {
        Self {
            task_id,
            kind,
            input,
            priority,
            status: TaskStatus::Processing,
            created_at: now,
            updated_at: now,
            result: None,
            error: None,
            retry_count: 0,
        }
    }
}
