//! Route table (endpoint list), following the router assembly style of
//! `tasker-orchestration/src/bin/server.rs`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/", post(handlers::submit_single))
        .route("/api/batch", post(handlers::submit_batch))
        .route("/api/task/{id}", get(handlers::get_task))
        .route("/api/task/{id}/cancel", post(handlers::cancel_task))
        .route("/api/download/{id}", get(handlers::download))
        .route("/api/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use hydrofind_broker::Broker;
    use hydrofind_shared::{Task, TaskKind, TaskStatus};
    use hydrofind_store::{InMemoryTaskStore, TaskStoreClient};
    use tower::ServiceExt;

    fn test_state(store: InMemoryTaskStore) -> Arc<AppState> {
        Arc::new(AppState {
            broker: Broker::in_memory(),
            store: Box::new(store),
            cache_short_circuit_enabled: false,
            reclaim_after_secs: 300,
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn submit_single_rejects_empty_query() {
        let app = router(test_state(InMemoryTaskStore::new(3600, 600, 86_400)));
        let request = Request::builder()
            .method("POST")
            .uri("/api/")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({"query": "   "}).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn submit_single_rejects_out_of_range_priority() {
        let app = router(test_state(InMemoryTaskStore::new(3600, 600, 86_400)));
        let request = Request::builder()
            .method("POST")
            .uri("/api/")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({"query": "dkol 12", "priority": 11}).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn submit_single_writes_processing_task_and_publishes() {
        let app = router(test_state(InMemoryTaskStore::new(3600, 600, 86_400)));
        let request = Request::builder()
            .method("POST")
            .uri("/api/")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({"query": "dkol 12"}).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "processing");
        assert!(body["task_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn get_task_returns_404_for_unknown_but_well_formed_id() {
        let app = router(test_state(InMemoryTaskStore::new(3600, 600, 86_400)));
        let id = uuid::Uuid::new_v4().to_string();
        let request = Request::builder().uri(format!("/api/task/{id}")).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_task_rejects_malformed_id() {
        let app = router(test_state(InMemoryTaskStore::new(3600, 600, 86_400)));
        let request = Request::builder().uri("/api/task/not-a-uuid").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_task_reclaims_a_stale_processing_task_to_timeout() {
        let store = InMemoryTaskStore::new(3600, 600, 86_400);
        let id = uuid::Uuid::new_v4().to_string();
        let stale_created_at = chrono::Utc::now().timestamp() - 1_000;
        let mut task = Task::new_processing(id.clone(), TaskKind::Single, "dkol 12".into(), 5, stale_created_at);
        task.created_at = stale_created_at;
        store.put_task(&task).await.unwrap();
        let app = router(test_state(store));

        let request = Request::builder().uri(format!("/api/task/{id}")).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "timeout");
    }

    #[tokio::test]
    async fn cancel_is_idempotent_on_a_completed_task() {
        let store = InMemoryTaskStore::new(3600, 600, 86_400);
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();
        let mut task = Task::new_processing(id.clone(), TaskKind::Single, "dkol 12".into(), 5, now);
        task.status = TaskStatus::Completed;
        store.put_task(&task).await.unwrap();
        let app = router(test_state(store));

        let request = Request::builder().method("POST").uri(format!("/api/task/{id}/cancel")).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "completed");
    }

    #[tokio::test]
    async fn download_rejects_a_task_still_processing() {
        let store = InMemoryTaskStore::new(3600, 600, 86_400);
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();
        let task = Task::new_processing(id.clone(), TaskKind::Single, "dkol 12".into(), 5, now);
        store.put_task(&task).await.unwrap();
        let app = router(test_state(store));

        let request = Request::builder().uri(format!("/api/download/{id}")).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_reports_ok_when_backends_are_reachable() {
        let app = router(test_state(InMemoryTaskStore::new(3600, 600, 86_400)));
        let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }
}
