pub mod configs;
pub mod diagrams;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error response body: `{"error": "message"}`
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// API error type
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(resource: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("{} not found", resource),
        }
    }

    /// The request was well-formed but its configuration could not be parsed
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.message);
        }
        (status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Typed NotFoundError maps to 404
        if let Some(nf) = err.downcast_ref::<crate::store::NotFoundError>() {
            return Self {
                status: StatusCode::NOT_FOUND,
                message: nf.to_string(),
            };
        }
        Self::internal(err.to_string())
    }
}

/// Message response for simple status messages
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Json<Self> {
        Json(Self { message: msg.into() })
    }
}

/// Healthcheck endpoint, returns 200 OK with status
pub async fn healthcheck() -> Json<serde_json::Value> {
    tracing::debug!("Health check requested");
    Json(serde_json::json!({
        "status": "healthy",
        "service": "config-melter",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
