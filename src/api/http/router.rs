// src/api/http/router.rs
// HTTP router composition

use axum::{
    Router,
    routing::{any, get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{
    auth::{current_user, login, logout, register},
    health::{health_check, liveness_check},
    project::{
        create_project_handler, get_project_handler, like_project_handler,
        list_projects_handler, unlike_project_handler,
    },
};
use crate::state::AppState;

/// The full application router, shared by the binary and the integration tests.
pub fn http_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(health_check))
        .route("/live", get(liveness_check))
        // Sessions
        .route("/auth/local", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", get(logout).post(logout))
        .route("/user", get(current_user))
        // Projects
        .route(
            "/project",
            get(list_projects_handler).post(create_project_handler),
        )
        .route("/project/create", any(create_project_handler))
        .route("/project/{id}", get(get_project_handler))
        .route(
            "/project/{id}/like",
            post(like_project_handler).delete(unlike_project_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}
