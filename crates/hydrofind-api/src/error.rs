//! HTTP error envelope: `{success:false, error:{message, details?}}`,
//! following the error-enum-to-status-code pattern common across axum
//! handlers (an `IntoResponse` impl keyed off a `status()` method).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed input: empty query, invalid priority, malformed task id.
    Validation(String),
    /// Referenced task does not exist (or has expired).
    NotFound,
    /// Task exists but isn't in a state the requested operation allows
    /// (e.g. downloading a task that hasn't completed).
    Conflict(String),
    /// Upstream (broker/store) failure.
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Validation(m) => m.clone(),
            ApiError::NotFound => "task not found".to_string(),
            ApiError::Conflict(m) => m.clone(),
            ApiError::Internal(m) => m.clone(),
        }
    }
}

impl From<hydrofind_shared::HydroError> for ApiError {
    fn from(e: hydrofind_shared::HydroError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.message(), "request failed");
        } else {
            tracing::debug!(error = %self.message(), "request rejected");
        }
        let body = ErrorEnvelope { success: false, error: ErrorBody { message: self.message(), details: None } };
        (status, Json(body)).into_response()
    }
}
