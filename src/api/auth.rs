use axum::{
    Extension, Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, AuthResponse, UserDto};
use crate::auth::{password, token};

// ============================================================================
// Request types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Identity of the caller, decoded from the bearer token by
/// [`auth_middleware`] and attached to request extensions.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
}

/// Authentication middleware: requires a valid, unexpired
/// `Authorization: Bearer <token>` header on every protected route.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let Some(bearer) = extract_bearer_token(&headers) else {
        return Err(ApiError::unauthorized("No token, authorization denied"));
    };

    let claims = token::verify(&bearer, &state.config().auth.jwt_secret)
        .map_err(|_| ApiError::unauthorized("Token is not valid"))?;

    request.extensions_mut().insert(AuthUser {
        id: claims.user.id,
    });
    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer` header
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
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

/// POST /api/auth/register
/// Create an account and return a session token with the public user view
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    if payload.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    // Fast-path rejection; the store re-checks under its lock so two
    // concurrent registrations still cannot both win.
    if state
        .store()
        .find_user_by_email(&payload.email)
        .await
        .is_some()
    {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash =
        password::hash(payload.password, state.config().security.clone()).await?;

    let user = state
        .store()
        .create_user(&payload.name, &payload.email, &password_hash)
        .await?;

    let token = issue_token(&state, user.id)?;
    tracing::info!("Registered user {} ({})", user.id, user.email);

    Ok(Json(ApiResponse::success(AuthResponse {
        token,
        user: user.into(),
    })))
}

/// POST /api/auth/login
/// Authenticate with email and password, returns a session token on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    // Unknown email and bad password produce the same response, so the
    // endpoint does not reveal which accounts exist.
    let Some(user) = state.store().find_user_by_email(&payload.email).await else {
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let is_valid = password::verify(payload.password, user.password.clone()).await?;
    if !is_valid {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = issue_token(&state, user.id)?;

    Ok(Json(ApiResponse::success(AuthResponse {
        token,
        user: user.into(),
    })))
}

/// GET /api/auth/me
/// Get the current user (requires authentication)
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .store()
        .get_user(auth.id)
        .await
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::success(user.into())))
}

fn issue_token(state: &AppState, user_id: i64) -> Result<String, ApiError> {
    let auth = &state.config().auth;
    token::issue(user_id, &auth.jwt_secret, auth.token_ttl_hours)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))
}
