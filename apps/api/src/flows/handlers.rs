//! Axum route handlers for the generation flows.

use axum::{extract::State, Json};
use tracing::info;

use crate::admin::AdminAccess;
use crate::errors::AppError;
use crate::flows::explain::{explain_project, ExplainProjectInput, ExplainResponse};
use crate::flows::narrate::{narrate, NarrateRequest, NarrationAudio};
use crate::flows::refine::{refine_project, RefineOutcome, RefineProjectInput};
use crate::flows::resume::{build_resume_prompt, generate_resume_html, ResumeResponse};
use crate::portfolio::profile::load_profile_data;
use crate::state::AppState;

/// POST /api/v1/ai/explain
pub async fn handle_explain(
    State(state): State<AppState>,
    Json(input): Json<ExplainProjectInput>,
) -> Result<Json<ExplainResponse>, AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    let response = explain_project(&state.flow_deps(), state.content_source.as_ref(), &input).await?;
    info!(title = %input.title, source = ?response.source, "Project explained");
    Ok(Json(response))
}

/// POST /api/v1/ai/refine (admin)
pub async fn handle_refine(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Json(input): Json<RefineProjectInput>,
) -> Result<Json<RefineOutcome>, AppError> {
    if input.title.trim().is_empty() && input.description.trim().is_empty() {
        return Err(AppError::Validation(
            "title or description is required".to_string(),
        ));
    }
    Ok(Json(refine_project(&state.flow_deps(), &input).await?))
}

/// POST /api/v1/ai/narrate
pub async fn handle_narrate(
    State(state): State<AppState>,
    Json(request): Json<NarrateRequest>,
) -> Result<Json<NarrationAudio>, AppError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    Ok(Json(narrate(&state.flow_deps(), text).await?))
}

/// POST /api/v1/ai/resume
pub async fn handle_resume(State(state): State<AppState>) -> Result<Json<ResumeResponse>, AppError> {
    let data = load_profile_data(&state.db).await;
    info!(
        skills = data.skills.len(),
        projects = data.projects.len(),
        "Generating resume"
    );
    let prompt = build_resume_prompt(&state.profile, &data);
    Ok(Json(generate_resume_html(&state.flow_deps(), &prompt).await?))
}
