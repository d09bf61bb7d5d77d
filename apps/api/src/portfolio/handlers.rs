//! Axum route handlers for projects and skills.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::admin::AdminAccess;
use crate::errors::AppError;
use crate::portfolio::models::{Project, ProjectInput, SkillsList};
use crate::portfolio::profile::default_skills;
use crate::portfolio::store;
use crate::state::AppState;

/// GET /api/v1/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(store::list_projects(&state.db).await?))
}

/// GET /api/v1/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, AppError> {
    store::get_project(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))
}

/// POST /api/v1/projects (admin)
pub async fn handle_create_project(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Json(input): Json<ProjectInput>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let input = input.validated()?;
    let project = store::create_project(&state.db, &input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/v1/projects/:id (admin)
pub async fn handle_update_project(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<Project>, AppError> {
    let input = input.validated()?;
    store::update_project(&state.db, id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))
}

/// DELETE /api/v1/projects/:id (admin)
pub async fn handle_delete_project(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if store::delete_project(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Project {id} not found")))
    }
}

/// GET /api/v1/skills
///
/// Falls back to the default list until skills have been saved.
pub async fn handle_get_skills(State(state): State<AppState>) -> Result<Json<SkillsList>, AppError> {
    let list = match store::get_skills(&state.db).await? {
        Some(list) if !list.is_empty() => list,
        _ => default_skills(),
    };
    Ok(Json(SkillsList { list }))
}

/// PUT /api/v1/skills (admin)
pub async fn handle_put_skills(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Json(skills): Json<SkillsList>,
) -> Result<Json<SkillsList>, AppError> {
    let skills = skills.validated()?;
    store::put_skills(&state.db, &skills.list).await?;
    Ok(Json(skills))
}
