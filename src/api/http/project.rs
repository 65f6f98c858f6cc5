// src/api/http/project.rs
// Project endpoints: list, fetch, create, like

use anyhow::anyhow;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::auth::{Caller, CurrentUser};
use crate::project::{
    NewProject, ProjectDetails, ProjectError, ProjectId, ProjectState, ProjectWithOwners,
    ProjectsResponse,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    pub state: Option<String>,
}

/// GET /project?state=
pub async fn list_projects_handler(
    State(app_state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Query(query): Query<ListProjectsQuery>,
) -> ApiResult<Json<ProjectsResponse>> {
    let state = query
        .state
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(ProjectState::from)
        .unwrap_or(ProjectState::Open);

    let projects = app_state
        .project_service
        .list_projects(&state, current_user.caller())
        .await?;

    Ok(Json(ProjectsResponse { projects }))
}

/// GET /project/{id}
pub async fn get_project_handler(
    State(app_state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<ProjectId>,
) -> ApiResult<Json<ProjectDetails>> {
    let project = app_state
        .project_service
        .get_project(id, current_user.caller())
        .await?;

    Ok(Json(project))
}

/// POST /project, and any verb on /project/create (only POST is accepted).
///
/// The body is read as JSON regardless of content type and merged with the
/// query parameters.
pub async fn create_project_handler(
    State(app_state): State<Arc<AppState>>,
    method: Method,
    current_user: CurrentUser,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ProjectWithOwners>)> {
    if method != Method::POST {
        return Err(ProjectError::UnsupportedOperation.into());
    }

    let caller = require_caller(current_user)?;

    let new_project = parse_body(&body)
        .and_then(|body| NewProject::from_payload(body, params))
        .map_err(ProjectError::Creation)?;

    let created = app_state
        .project_service
        .create_project(new_project, &caller)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /project/{id}/like
pub async fn like_project_handler(
    State(app_state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<ProjectId>,
) -> ApiResult<Json<ProjectDetails>> {
    let caller = require_caller(current_user)?;
    let project = app_state.project_service.like_project(id, &caller).await?;
    Ok(Json(project))
}

/// DELETE /project/{id}/like
pub async fn unlike_project_handler(
    State(app_state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<ProjectId>,
) -> ApiResult<Json<ProjectDetails>> {
    let caller = require_caller(current_user)?;
    let project = app_state.project_service.unlike_project(id, &caller).await?;
    Ok(Json(project))
}

fn require_caller(current_user: CurrentUser) -> ApiResult<Caller> {
    current_user
        .0
        .ok_or_else(|| ApiError::unauthorized("You must be logged in to do that."))
}

fn parse_body(body: &[u8]) -> anyhow::Result<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("Expected a JSON object, got {}", other)),
    }
}
