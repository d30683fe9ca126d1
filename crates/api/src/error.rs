//! API error type and its HTTP mapping.
//!
//! Handlers return [`AppError`]; the [`IntoResponse`] impl converts each
//! variant into a status code and a JSON body of the shape
//! `{"error": "...", "code": <status>}`. Internal details (database errors,
//! engine failures) are logged but never leaked to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use voicenotes_core::error::CoreError;
use voicenotes_whisper::EngineError;

/// Unified error type for API handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("transcription engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias for handler return types.
pub type ApiResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                format!("{entity} {id} not found"),
            ),
            AppError::Core(CoreError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg),
            AppError::Core(CoreError::Unauthorized(msg)) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Core(CoreError::Internal(msg)) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            AppError::Database(err) => {
                // Unique-constraint violations surface as client errors; the
                // constraint names follow the `uq_` convention.
                if let sqlx::Error::Database(db_err) = &err {
                    if db_err.code().as_deref() == Some("23505") {
                        let message = match db_err.constraint() {
                            Some(name) if name.starts_with("uq_users_email") => {
                                "Email already registered".to_string()
                            }
                            _ => "Resource already exists".to_string(),
                        };
                        return error_response(StatusCode::BAD_REQUEST, message);
                    }
                }
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Engine(err) => {
                tracing::error!(error = %err, "transcription engine error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Transcription failed".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        error_response(status, message)
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body = json!({
        "error": message,
        "code": status.as_u16(),
    });
    (status, Json(body)).into_response()
}
