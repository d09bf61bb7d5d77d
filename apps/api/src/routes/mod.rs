pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::flows::handlers as flows;
use crate::portfolio::handlers as portfolio;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Portfolio content
        .route(
            "/api/v1/projects",
            get(portfolio::handle_list_projects).post(portfolio::handle_create_project),
        )
        .route(
            "/api/v1/projects/:id",
            get(portfolio::handle_get_project)
                .put(portfolio::handle_update_project)
                .delete(portfolio::handle_delete_project),
        )
        .route(
            "/api/v1/skills",
            get(portfolio::handle_get_skills).put(portfolio::handle_put_skills),
        )
        // Generation flows
        .route("/api/v1/ai/explain", post(flows::handle_explain))
        .route("/api/v1/ai/refine", post(flows::handle_refine))
        .route("/api/v1/ai/narrate", post(flows::handle_narrate))
        .route("/api/v1/ai/resume", post(flows::handle_resume))
        .with_state(state)
}
