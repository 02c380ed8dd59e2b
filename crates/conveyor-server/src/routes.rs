//! HTTP surface: router, handlers, error mapping.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde::Serialize;
use tracing::error;

use conveyor_core::{Task, TaskError, TaskService, TaskState};

use crate::middleware::request_context;

pub fn router(service: Arc<TaskService>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/enqueue", post(enqueue_task))
        .route("/api/v1/tasks/{task_id}", get(get_task_state))
        .layer(middleware::from_fn(request_context))
        .with_state(service)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn enqueue_task(
    State(service): State<Arc<TaskService>>,
    Json(task): Json<Task>,
) -> Result<StatusCode, ApiError> {
    service.enqueue_task(task).await?;
    Ok(StatusCode::ACCEPTED)
}

#[derive(Serialize)]
struct TaskStateResponse {
    task_state: TaskState,
}

async fn get_task_state(
    State(service): State<Arc<TaskService>>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskStateResponse>, ApiError> {
    let task_state = service.task_state(&task_id).await?;
    Ok(Json(TaskStateResponse { task_state }))
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

/// Maps core errors onto status codes with a `{"message": ...}` body. The
/// underlying error is logged, not leaked.
struct ApiError(TaskError);

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            TaskError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid task"),
            TaskError::NotFound => (StatusCode::NOT_FOUND, "task not found"),
            TaskError::QueueClosed => (StatusCode::SERVICE_UNAVAILABLE, "shutting down"),
            TaskError::Cancelled => (StatusCode::INTERNAL_SERVER_ERROR, "request cancelled"),
        };
        error!(error = %self.0, "request failed");
        let body = Json(ErrorResponse {
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use conveyor_core::{CoreConfig, InMemoryStateStore, SimulatedExecutor};

    use super::*;

    fn test_router() -> Router {
        let store = Arc::new(InMemoryStateStore::new());
        let executor = Arc::new(SimulatedExecutor {
            work_min: std::time::Duration::from_millis(1),
            work_max: std::time::Duration::from_millis(2),
            failure_probability: 0.0,
            base_delay: std::time::Duration::from_millis(1),
        });
        let config = CoreConfig {
            workers: 2,
            queue_capacity: 8,
        };
        let service = Arc::new(TaskService::new(config, store, executor).unwrap());
        router(service)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = test_router();
        let response = app
            .oneshot(
                Request::get("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn enqueue_then_query_state() {
        let app = test_router();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/enqueue")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"id": "t1", "payload": "p", "max_retries": 3}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app
            .oneshot(
                Request::get("/api/v1/tasks/t1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let state = body["task_state"].as_str().unwrap();
        assert!(["queued", "running", "done"].contains(&state), "{state}");
    }

    #[tokio::test]
    async fn invalid_task_is_bad_request() {
        let app = test_router();
        let response = app
            .oneshot(
                Request::post("/api/v1/enqueue")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"id": "", "payload": "p", "max_retries": 3}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "invalid task");
    }

    #[tokio::test]
    async fn unknown_task_is_not_found() {
        let app = test_router();
        let response = app
            .oneshot(
                Request::get("/api/v1/tasks/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
