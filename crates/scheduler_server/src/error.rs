//! HTTP error envelope.
//!
//! Every failure is rendered as `{"error": "<message>"}` with a status code
//! chosen by error class.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use scheduler_core::{RecurrenceError, TaskServiceError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Request input was rejected (400).
    BadRequest(String),
    /// Target record does not exist (404).
    NotFound(String),
    /// Route exists but not for this HTTP method (405).
    MethodNotAllowed,
    /// Storage or server-side failure (500).
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message) | Self::NotFound(message) | Self::Internal(message) => {
                message
            }
            Self::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=http_request_failed module=server status=error http_status={} error={}",
                status.as_u16(),
                self.message()
            );
        } else {
            warn!(
                "event=http_request_failed module=server status=rejected http_status={} error={}",
                status.as_u16(),
                self.message()
            );
        }

        (
            status,
            Json(ErrorBody {
                error: self.message(),
            }),
        )
            .into_response()
    }
}

impl From<RecurrenceError> for ApiError {
    fn from(value: RecurrenceError) -> Self {
        Self::BadRequest(value.to_string())
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(value: TaskServiceError) -> Self {
        match value {
            TaskServiceError::Validation(err) => Self::BadRequest(err.to_string()),
            TaskServiceError::Recurrence(err) => Self::BadRequest(err.to_string()),
            TaskServiceError::TaskNotFound(_) => Self::NotFound("task not found".to_string()),
            TaskServiceError::Repo(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(format!("invalid JSON body: {}", value.body_text()))
    }
}
