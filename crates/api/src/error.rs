//! API Errors

use ad_model::ValidationError;
use auth::AuthError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use storage::StorageError;
use thiserror::Error;
use tracing::error;

/// Error returned by handlers, rendered as `{"error": message}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal(detail) => {
                error!("Request failed: {}", detail);
                "Server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(_) => ApiError::Conflict("User already exists".to_string()),
            StorageError::NotFound => ApiError::NotFound("Not found".to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidSignup(msg) => ApiError::BadRequest(msg),
            AuthError::Hashing(msg) | AuthError::InvalidConfig(msg) => ApiError::Internal(msg),
            AuthError::MissingToken => {
                ApiError::Unauthorized("Not authorized, no token".to_string())
            }
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::InvalidToken(_) | AuthError::Expired => {
                ApiError::Unauthorized("Not authorized, token failed".to_string())
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingField(_) => ApiError::BadRequest(
                "Please provide title, text, budget, audience, and platform".to_string(),
            ),
            ValidationError::InvalidBudget(_) | ValidationError::BudgetTooLarge(_) => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<planner::PlannerError> for ApiError {
    fn from(err: planner::PlannerError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
