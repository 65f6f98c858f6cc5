// src/api/http/auth.rs

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::extract::JsonOrForm;
use crate::auth::extract::{cleared_session_cookie, session_cookie};
use crate::auth::{AuthFailure, AuthResponse, CurrentUser, LoginRequest, RegisterRequest, User};
use crate::config::CONFIG;
use crate::state::AppState;

/// POST /auth/local
pub async fn login(
    State(app_state): State<Arc<AppState>>,
    JsonOrForm(req): JsonOrForm<LoginRequest>,
) -> Result<Response, AuthError> {
    let response = app_state.auth_service.login(req).await?;
    Ok(with_session(response))
}

/// POST /auth/register
pub async fn register(
    State(app_state): State<Arc<AppState>>,
    JsonOrForm(req): JsonOrForm<RegisterRequest>,
) -> Result<Response, AuthError> {
    let response = app_state.auth_service.register(req).await?;
    Ok((StatusCode::CREATED, with_session(response)).into_response())
}

/// GET /auth/logout
pub async fn logout() -> impl IntoResponse {
    (
        [(SET_COOKIE, cleared_session_cookie())],
        Json(serde_json::json!({ "message": "Logged out." })),
    )
}

/// GET /user
pub async fn current_user(
    State(app_state): State<Arc<AppState>>,
    current_user: CurrentUser,
) -> Result<Json<User>, AuthError> {
    let caller = current_user.0.ok_or(AuthError::Unauthenticated)?;

    let user = app_state
        .auth_service
        .find_active_user(&caller.id)
        .await?
        .ok_or(AuthError::Unauthenticated)?;

    Ok(Json(user))
}

fn with_session(response: AuthResponse) -> Response {
    let max_age = CONFIG.auth.token_ttl_secs();
    (
        [(SET_COOKIE, session_cookie(&response.token, max_age))],
        Json(response),
    )
        .into_response()
}

#[derive(Debug)]
pub enum AuthError {
    Failure(AuthFailure),
    Unauthenticated,
}

impl From<AuthFailure> for AuthError {
    fn from(err: AuthFailure) -> Self {
        AuthError::Failure(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let error = match self {
            AuthError::Failure(err) => ApiError::from(err),
            AuthError::Unauthenticated => ApiError::unauthorized("Not logged in."),
        };

        error.into_response()
    }
}
