//! Error handling for the Paddy Yield Advisory Platform
//!
//! Maps the pipeline error taxonomy onto HTTP responses: input validation
//! failures are client errors naming the offending field, inference and
//! decode failures are server errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::PredictionError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    // Input validation errors
    #[error("Missing input key: {0}")]
    MissingInputKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidInputValue { key: String, value: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Pipeline errors
    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Decode error: {0}")]
    Decode(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::MissingKey { key } => AppError::MissingInputKey(key.to_string()),
            PredictionError::InvalidValue { key, value } => AppError::InvalidInputValue {
                key: key.to_string(),
                value,
            },
            PredictionError::Inference(msg) => AppError::Inference(msg),
            PredictionError::Decode {
                target,
                code,
                known,
            } => AppError::Decode(format!(
                "class code {code} outside known label range for {target} ({known} labels)"
            )),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid email or password".to_string(),
                    field: None,
                },
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "TOKEN_EXPIRED".to_string(),
                    message: "Token has expired".to_string(),
                    field: None,
                },
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_TOKEN".to_string(),
                    message: "Invalid token".to_string(),
                    field: None,
                },
            ),
            AppError::MissingInputKey(key) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "MISSING_INPUT_KEY".to_string(),
                    message: format!("Missing input key: {}", key),
                    field: Some(key.clone()),
                },
            ),
            AppError::InvalidInputValue { key, value } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_INPUT_VALUE".to_string(),
                    message: format!("Value for {} is not numeric: {}", key, value),
                    field: Some(key.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message: format!("A record with this {} already exists", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::Inference(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INFERENCE_ERROR".to_string(),
                    message: format!("Model inference failed: {}", msg),
                    field: None,
                },
            ),
            AppError::Decode(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DECODE_ERROR".to_string(),
                    message: format!("Label decoding failed: {}", msg),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Decode errors mean a corrupt artifact or train/serve skew, not a
        // bad request. Keep them loud.
        match &self {
            AppError::Decode(msg) => {
                tracing::error!("artifact decode failure: {}", msg);
            }
            other => {
                tracing::error!("Error: {:?}", other);
            }
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
