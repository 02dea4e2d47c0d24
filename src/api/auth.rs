use axum::{
    Extension, Json,
    extract::{Request, State},
    extract::rejection::JsonRejection,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::json_body;
use super::{ApiError, ApiResponse, AppState};
use crate::domain::OwnerId;
use crate::services::UserInfo;

const SESSION_OWNER_KEY: &str = "owner_id";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub api_key: String,
}

#[derive(Serialize)]
pub struct ApiKeyResponse {
    pub api_key: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the caller to an [`OwnerId`] stored in the request extensions.
///
/// Checked in order:
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Ok(Some(owner)) = session.get::<OwnerId>(SESSION_OWNER_KEY).await {
        tracing::Span::current().record("user_id", owner.value());
        request.extensions_mut().insert(owner);
        return Ok(next.run(request).await);
    }

    if let Some(key) = extract_api_key(&headers) {
        match state.shared.auth.verify_api_key(&key).await {
            Ok(Some(owner)) => {
                tracing::Span::current().record("user_id", owner.value());
                request.extensions_mut().insert(owner);
                return Ok(next.run(request).await);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("API key lookup failed: {e}"),
        }
    }

    Err(ApiError::Unauthorized("Authentication required".to_string()))
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with username and password, returns API key on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let payload = json_body(payload)?;
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .shared
        .auth
        .login(&payload.username, &payload.password)
        .await?;

    session
        .insert(SESSION_OWNER_KEY, user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!("User '{}' logged in", user.username);

    Ok(Json(ApiResponse::success(LoginResponse {
        username: user.username,
        api_key: user.api_key,
    })))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Json<ApiResponse<()>> {
    if let Err(e) = session.flush().await {
        tracing::warn!("Failed to flush session: {e}");
    }
    Json(ApiResponse::message("Logged out"))
}

/// GET /auth/me
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = state.shared.auth.get_user_info(owner).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// POST /auth/api-key/regenerate
pub async fn regenerate_api_key(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<ApiResponse<ApiKeyResponse>>, ApiError> {
    let api_key = state.shared.auth.regenerate_api_key(owner).await?;
    tracing::info!("API key regenerated for owner {owner}");
    Ok(Json(ApiResponse::success(ApiKeyResponse { api_key })))
}
