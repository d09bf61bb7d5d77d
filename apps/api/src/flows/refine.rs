//! Refine Project: polishes a project's title, description and tags.
//!
//! Defaults to placeholder mode: a terminal failure becomes `{ "error": ... }`
//! with a busy-vs-unexpected message instead of an error status.

use serde::{Deserialize, Serialize};

use crate::flows::prompts::{REFINE_PROMPT_TEMPLATE, REFINE_SYSTEM};
use crate::flows::FlowDeps;
use crate::portfolio::models::dedupe_labels;
use crate::resilience::normalize::normalize_json;
use crate::resilience::{FailureMode, GenerationFailure, Rejection};

#[derive(Debug, Clone, Deserialize)]
pub struct RefineProjectInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinedProject {
    pub refined_title: String,
    pub refined_description: String,
    pub refined_tags: Vec<String>,
}

/// Either refined copy or a user-facing error message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RefineOutcome {
    Refined(RefinedProject),
    Failed { error: String },
}

pub async fn refine_project(
    deps: &FlowDeps<'_>,
    input: &RefineProjectInput,
) -> Result<RefineOutcome, GenerationFailure> {
    let prompt = REFINE_PROMPT_TEMPLATE
        .replace("{title}", &input.title)
        .replace("{description}", &input.description)
        .replace("{tags}", &quoted_list(&input.tags));

    deps.invoker
        .invoke_settled(
            "refine_project",
            || deps.generator.generate_text(&prompt, REFINE_SYSTEM),
            |raw: String| {
                let refined = normalize_json::<RefinedProject>(&raw)?;
                clean_refinement(refined).map(RefineOutcome::Refined)
            },
            deps.mode_or(FailureMode::Placeholder),
            |failure| RefineOutcome::Failed {
                error: failure.user_message().to_string(),
            },
        )
        .await
}

/// Trims fields, capitalizes the description and de-duplicates tags.
/// A blank title or description counts as empty output.
fn clean_refinement(refined: RefinedProject) -> Result<RefinedProject, Rejection> {
    let title = refined.refined_title.trim();
    let description = refined.refined_description.trim();
    if title.is_empty() || description.is_empty() {
        return Err(Rejection::Empty);
    }
    Ok(RefinedProject {
        refined_title: title.to_string(),
        refined_description: capitalize_first(description),
        refined_tags: dedupe_labels(&refined.refined_tags),
    })
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{item}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
