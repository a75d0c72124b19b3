use std::sync::Arc;

use auth::AuthError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::AppState;

/// Authenticated caller, inserted into request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;
    let claims = state.tokens.validate(token)?;

    // the token may name a user this store has never seen
    if state.store.find_user_by_id(claims.sub).await?.is_none() {
        return Err(AuthError::InvalidToken("unknown user".to_string()).into());
    }

    req.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let header = header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("non-ascii header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}
