//! The JSON envelope every endpoint answers with
//!
//! Successes are `{success: true, data, message}` (listings add `total`);
//! failures are `{success: false, error, message}` with the status code
//! carried alongside. Service failures map onto status codes here, in one
//! place.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::service::ServiceError;

pub fn ok<T: Serialize>(data: T, message: &str) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": data,
        "message": message,
    }))
}

pub fn ok_page<T: Serialize>(data: T, total: usize, message: &str) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": data,
        "total": total,
        "message": message,
    }))
}

/// Error half of the envelope.
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: "Habit not found".to_string(),
            message: message.to_string(),
        }
    }

    /// Endpoint-specific wording for unexpected failures. Validation and
    /// not-found responses keep their standard messages.
    pub fn internal_context(mut self, message: &str) -> Self {
        if self.status == StatusCode::INTERNAL_SERVER_ERROR {
            self.message = message.to_string();
        }
        self
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let (status, message) = match &err {
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "Invalid habit data"),
            ServiceError::NotFound => (StatusCode::NOT_FOUND, "Habit not found"),
            ServiceError::Storage { .. } => {
                tracing::error!(error = %err, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred")
            }
        };

        Self {
            status,
            error: err.to_string(),
            message: message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.error,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}
