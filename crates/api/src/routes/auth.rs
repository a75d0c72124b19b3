//! Account Routes

use auth::{hash_password, verify_password, AuthError, SignupRequest};
use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::{NewUser, User};
use tracing::info;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: User,
}

/// Run key derivation off the async workers
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("password task failed: {}", e)))
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(request) = body?;
    request.validate()?;

    let password = request.password.clone();
    let password_hash = blocking(move || hash_password(&password)).await?;

    let user = state
        .store
        .create_user(NewUser {
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            password_hash,
        })
        .await?;
    info!("Registered user {} ({})", user.id, user.email);

    let token = state.tokens.issue(user.id, &user.email)?;
    Ok(Json(SessionResponse {
        success: true,
        token,
        user,
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(request) = body?;
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Please provide email and password".to_string(),
        ));
    }

    let user = state
        .store
        .find_user_by_email(request.email.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let stored = user.password_hash.clone();
    let matches = blocking(move || verify_password(&request.password, &stored)).await??;
    if !matches {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.issue(user.id, &user.email)?;
    info!("User {} logged in", user.id);
    Ok(Json(SessionResponse {
        success: true,
        token,
        user,
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<MeResponse>, ApiError> {
    let user = state
        .store
        .find_user_by_id(current.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        success: true,
        user,
    }))
}
