//! HTTP handlers for the Producer (submit single/batch) and StatusAPI (get,
//! cancel, download, health) surfaces.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use hydrofind_artifact::ArtifactBuilder;
use hydrofind_broker::WorkMessage;
use hydrofind_shared::{fingerprint, ResultSource, Task, TaskError, TaskKind, TaskResult, TaskStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

fn validate_priority(priority: Option<i64>) -> Result<u8, ApiError> {
    match priority {
        None => Ok(5),
        Some(p) if (0..=10).contains(&p) => Ok(p as u8),
        Some(p) => Err(ApiError::Validation(format!("priority {p} out of range [0,10]"))),
    }
}

fn validate_task_id(id: &str) -> Result<(), ApiError> {
    Uuid::parse_str(id).map(|_| ()).map_err(|_| ApiError::Validation("malformed task id".into()))
}

fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

#[derive(Deserialize)]
pub struct SingleRequest {
    query: String,
    priority: Option<i64>,
    #[serde(default)]
    metadata: Value,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    text: String,
    priority: Option<i64>,
    #[serde(default)]
    metadata: Value,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    task_id: String,
    status: TaskStatus,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    timestamp: String,
    request_id: String,
}

/// `POST /api/` : validate, cache-short-circuit when enabled,
/// otherwise write `processing` and publish.
pub async fn submit_single(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SingleRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::Validation("query must not be empty".into()));
    }
    let priority = validate_priority(req.priority)?;
    let task_id = Uuid::new_v4().to_string();
    let now = Utc::now().timestamp();

    if state.cache_short_circuit_enabled {
        let fp = fingerprint::fingerprint(&query);
        if let Some(mut cached) = state.store.get_search_cache(&fp).await? {
            cached.source = ResultSource::Cache;
            let task = Task {
                result: Some(TaskResult::Single(cached)),
                status: TaskStatus::Completed,
                updated_at: now,
                ..Task::new_processing(task_id.clone(), TaskKind::Single, query.clone(), priority, now)
            };
            state.store.put_task(&task).await?;
            return Ok(Json(SubmitResponse {
                task_id: task_id.clone(),
                status: TaskStatus::Completed,
                kind: None,
                timestamp: now_iso(),
                request_id: task_id,
            }));
        }
    }

    let task = Task::new_processing(task_id.clone(), TaskKind::Single, query.clone(), priority, now);
    state.store.put_task(&task).await?;

    let message = WorkMessage::Single { task_id: task_id.clone(), query, priority, metadata: req.metadata };
    if let Err(e) = state.broker.publish(&message).await {
        // Don't leave an orphan `processing` task behind.
        let _ = state.store.delete_task(&task_id).await;
        return Err(ApiError::Internal(e.to_string()));
    }

    Ok(Json(SubmitResponse {
        task_id: task_id.clone(),
        status: TaskStatus::Processing,
        kind: None,
        timestamp: now_iso(),
        request_id: task_id,
    }))
}

/// `POST /api/batch`. Never cache-short-circuits at this layer — each
/// sub-query's own CACHE_PROBE happens in the Worker after `split_batch`.
pub async fn submit_batch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::Validation("text must not be empty".into()));
    }
    let priority = validate_priority(req.priority)?;
    let task_id = Uuid::new_v4().to_string();
    let now = Utc::now().timestamp();

    let task = Task::new_processing(task_id.clone(), TaskKind::Batch, text.clone(), priority, now);
    state.store.put_task(&task).await?;

    let message = WorkMessage::Batch { task_id: task_id.clone(), text, priority, metadata: req.metadata };
    if let Err(e) = state.broker.publish(&message).await {
        let _ = state.store.delete_task(&task_id).await;
        return Err(ApiError::Internal(e.to_string()));
    }

    Ok(Json(SubmitResponse {
        task_id: task_id.clone(),
        status: TaskStatus::Processing,
        kind: Some("batch"),
        timestamp: now_iso(),
        request_id: task_id,
    }))
}

#[derive(Serialize)]
pub struct TaskView {
    task_id: String,
    status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<TaskResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<TaskError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    age_seconds: Option<i64>,
    timestamp: String,
    request_id: String,
}

/// `GET /api/task/<id>` : the only place `processing` →
/// `timeout` reclamation happens.
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskView>, ApiError> {
    validate_task_id(&task_id)?;
    let mut task = state.store.get_task(&task_id).await?.ok_or(ApiError::NotFound)?;

    let now = Utc::now().timestamp();
    let age = now - task.created_at;
    if task.status == TaskStatus::Processing && age > state.reclaim_after_secs {
        task.status = TaskStatus::Timeout;
        task.updated_at = now;
        state.store.put_task(&task).await?;
    }

    Ok(Json(TaskView {
        task_id: task_id.clone(),
        status: task.status,
        result: task.result,
        error: task.error,
        age_seconds: Some(age),
        timestamp: now_iso(),
        request_id: task_id,
    }))
}

#[derive(Serialize)]
pub struct CancelResponse {
    task_id: String,
    status: TaskStatus,
    timestamp: String,
    request_id: String,
}

/// `POST /api/task/<id>/cancel` : advisory, idempotent on
/// terminal states.
pub async fn cancel_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<CancelResponse>, ApiError> {
    validate_task_id(&task_id)?;
    let mut task = state.store.get_task(&task_id).await?.ok_or(ApiError::NotFound)?;

    if task.status == TaskStatus::Processing {
        task.status = TaskStatus::Canceled;
        task.updated_at = Utc::now().timestamp();
        state.store.put_task(&task).await?;
    }

    Ok(Json(CancelResponse {
        task_id: task_id.clone(),
        status: task.status,
        timestamp: now_iso(),
        request_id: task_id,
    }))
}

/// `GET /api/download/<id>` : materialize the artifact from
/// `result` on demand; bytes are never persisted (see hydrofind-worker's
/// BUILD_ARTIFACT stage, which only writes a reference marker).
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    validate_task_id(&task_id)?;
    let task = state.store.get_task(&task_id).await?.ok_or(ApiError::NotFound)?;
    if task.status != TaskStatus::Completed {
        return Err(ApiError::Conflict("task is not completed".into()));
    }
    let result = task.result.ok_or_else(|| ApiError::Internal("completed task is missing its result".into()))?;

    let builder = ArtifactBuilder::default();
    let bytes = builder.build(&result)?;

    let headers = [
        (axum::http::header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (axum::http::header::CONTENT_DISPOSITION, format!("attachment; filename=\"{task_id}.csv\"")),
    ];
    Ok((headers, bytes))
}

#[derive(Serialize)]
struct ServiceHealth {
    connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_count: Option<u64>,
}

#[derive(Serialize)]
struct Services {
    cache: ServiceHealth,
    broker: ServiceHealth,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    services: Services,
    timestamp: String,
}

/// `GET /api/health`. Never fails; backend outages are reported in the body.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let cache = match state.store.health_check().await {
        Ok(h) => ServiceHealth { connected: h.connected, key_count: h.key_count },
        Err(_) => ServiceHealth { connected: false, key_count: None },
    };
    let broker_connected = state.broker.is_connected();
    let status = if cache.connected && broker_connected { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        services: Services { cache, broker: ServiceHealth { connected: broker_connected, key_count: None } },
        timestamp: now_iso(),
    })
}
