//! Error types for the staff web service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use desk::DeskError;
use thiserror::Error;

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum AppError {
    /// Error from the complaint desk.
    #[error(transparent)]
    Desk(#[from] DeskError),

    /// A staff endpoint was called without a usable session.
    #[error("{0}")]
    Session(String),
}

impl AppError {
    pub fn no_session() -> Self {
        AppError::Session("No staff session; sign in first".to_string())
    }

    pub fn no_department() -> Self {
        AppError::Session("No department selected".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Desk(DeskError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Desk(DeskError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::Desk(err) => {
                tracing::error!("Desk error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            AppError::Session(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for request handlers.
pub type Result<T> = std::result::Result<T, AppError>;
