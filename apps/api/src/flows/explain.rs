//! Explain Project: a short structured explanation of a portfolio project.
//!
//! Flow: fetch the project's page (if it has a link) → resolve prompt variant
//!       (page content, else owner metadata) → invoke → normalize JSON.

use serde::{Deserialize, Serialize};

use crate::flows::prompts::{
    EXPLAIN_FROM_METADATA_TEMPLATE, EXPLAIN_FROM_PAGE_TEMPLATE, EXPLAIN_OUTPUT_SCHEMA,
    EXPLAIN_SYSTEM,
};
use crate::flows::FlowDeps;
use crate::llm_client::prompts::join_inline;
use crate::resilience::normalize::normalize_json;
use crate::resilience::{resolve, FailureMode, GenerationFailure, PrimaryContent, Rejection};
use crate::web_content::ContentSource;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainProjectInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Project page to read. Without it only the metadata above is used.
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectExplanation {
    pub summary: String,
    pub features: Vec<String>,
    pub tech_stack: String,
}

impl ProjectExplanation {
    fn unavailable(failure: &GenerationFailure) -> Self {
        ProjectExplanation {
            summary: failure.user_message().to_string(),
            features: Vec::new(),
            tech_stack: String::new(),
        }
    }
}

/// Which input the explanation was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplainSource {
    ProjectPage,
    Metadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainResponse {
    #[serde(flatten)]
    pub explanation: ProjectExplanation,
    pub source: ExplainSource,
}

pub async fn explain_project(
    deps: &FlowDeps<'_>,
    content_source: &dyn ContentSource,
    input: &ExplainProjectInput,
) -> Result<ExplainResponse, GenerationFailure> {
    let primary = match input.link.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        Some(link) => PrimaryContent::from(content_source.fetch(link).await),
        None => PrimaryContent::unavailable("project has no link"),
    };

    let payload = resolve(
        primary,
        |page| build_page_prompt(input, &page),
        || build_metadata_prompt(input),
    );
    let source = if payload.is_primary() {
        ExplainSource::ProjectPage
    } else {
        ExplainSource::Metadata
    };
    let prompt = payload.into_inner();

    let explanation = deps
        .invoker
        .invoke_settled(
            "explain_project",
            || deps.generator.generate_text(&prompt, EXPLAIN_SYSTEM),
            |raw: String| clean_explanation(normalize_json::<ProjectExplanation>(&raw)?),
            deps.mode_or(FailureMode::Propagate),
            ProjectExplanation::unavailable,
        )
        .await?;

    Ok(ExplainResponse {
        explanation,
        source,
    })
}

/// Trims every field and drops blank features. A blank summary counts as
/// empty output.
fn clean_explanation(explanation: ProjectExplanation) -> Result<ProjectExplanation, Rejection> {
    let summary = explanation.summary.trim();
    if summary.is_empty() {
        return Err(Rejection::Empty);
    }
    Ok(ProjectExplanation {
        summary: summary.to_string(),
        features: explanation
            .features
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect(),
        tech_stack: explanation.tech_stack.trim().to_string(),
    })
}

fn build_page_prompt(input: &ExplainProjectInput, page: &str) -> String {
    EXPLAIN_FROM_PAGE_TEMPLATE
        .replace("{title}", &input.title)
        .replace("{tags}", &join_inline(&input.tags))
        .replace("{output_schema}", EXPLAIN_OUTPUT_SCHEMA)
        .replace("{page_content}", page)
}

fn build_metadata_prompt(input: &ExplainProjectInput) -> String {
    EXPLAIN_FROM_METADATA_TEMPLATE
        .replace("{title}", &input.title)
        .replace("{description}", &input.description)
        .replace("{tags}", &join_inline(&input.tags))
        .replace("{output_schema}", EXPLAIN_OUTPUT_SCHEMA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::{busy, deps, ScriptedGenerator, StaticSource};

    const EXPLANATION_JSON: &str = r#"```json
{"summary": "A realtime chat app.", "features": ["Send messages", "Create rooms", "Share images"], "techStack": "Built with React and Firebase."}
```"#;

    fn input(link: Option<&str>) -> ExplainProjectInput {
        ExplainProjectInput {
            title: "Chat App".to_string(),
            description: "Chat with friends in realtime".to_string(),
            tags: vec!["React".to_string(), "Firebase".to_string()],
            link: link.map(str::to_string),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_uses_page_content_when_available() {
        let generator = ScriptedGenerator::with_text(vec![Ok(EXPLANATION_JSON.to_string())]);
        let source = StaticSource::page("Welcome to   Chat App. Rooms, images and more.");

        let response = explain_project(&deps(&generator, None), &source, &input(Some("https://chat.example")))
            .await
            .unwrap();

        assert_eq!(response.source, ExplainSource::ProjectPage);
        assert_eq!(response.explanation.summary, "A realtime chat app.");
        assert_eq!(response.explanation.features.len(), 3);
        let prompt = generator.last_prompt();
        assert!(prompt.contains("Welcome to Chat App. Rooms, images and more."));
        assert!(!prompt.contains("Chat with friends in realtime"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_falls_back_to_metadata_when_fetch_fails() {
        let generator = ScriptedGenerator::with_text(vec![Ok(EXPLANATION_JSON.to_string())]);
        let source = StaticSource::failing();

        let response = explain_project(&deps(&generator, None), &source, &input(Some("https://chat.example")))
            .await
            .unwrap();

        assert_eq!(response.source, ExplainSource::Metadata);
        assert_eq!(source.fetches(), 1);
        assert!(generator.last_prompt().contains("Chat with friends in realtime"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_link_skips_fetch() {
        let generator = ScriptedGenerator::with_text(vec![Ok(EXPLANATION_JSON.to_string())]);
        let source = StaticSource::page("unused");

        let response = explain_project(&deps(&generator, None), &source, &input(Some("   ")))
            .await
            .unwrap();

        assert_eq!(response.source, ExplainSource::Metadata);
        assert_eq!(source.fetches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_primary_fetch_is_not_retried_with_generation() {
        let generator = ScriptedGenerator::with_text(vec![
            Err(busy()),
            Ok(EXPLANATION_JSON.to_string()),
        ]);
        let source = StaticSource::page("Page text");

        explain_project(&deps(&generator, None), &source, &input(Some("https://chat.example")))
            .await
            .unwrap();

        assert_eq!(generator.calls(), 2);
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_exhaustion_propagates_by_default() {
        let generator = ScriptedGenerator::with_text(vec![Err(busy()), Err(busy()), Err(busy())]);
        let source = StaticSource::failing();

        let failure = explain_project(&deps(&generator, None), &source, &input(None))
            .await
            .unwrap_err();

        assert!(failure.is_service_busy());
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_placeholder_override_returns_message() {
        let generator = ScriptedGenerator::with_text(vec![Err(busy()), Err(busy()), Err(busy())]);
        let source = StaticSource::failing();

        let response = explain_project(
            &deps(&generator, Some(FailureMode::Placeholder)),
            &source,
            &input(None),
        )
        .await
        .unwrap();

        assert!(response.explanation.summary.contains("busy"));
        assert!(response.explanation.features.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_explanation_is_retried_until_exhausted() {
        let blank = r#"{"summary": "  ", "features": [], "techStack": ""}"#;
        let generator = ScriptedGenerator::with_text(vec![
            Ok(blank.to_string()),
            Ok(blank.to_string()),
            Ok(blank.to_string()),
        ]);
        let source = StaticSource::failing();

        let failure = explain_project(&deps(&generator, None), &source, &input(None))
            .await
            .unwrap_err();

        assert_eq!(generator.calls(), 3);
        assert!(matches!(
            failure,
            GenerationFailure::Exhausted {
                attempts: 3,
                reason: crate::resilience::RetryReason::EmptyOutput
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_explanation_fields_are_trimmed() {
        let padded = r#"{"summary": " A chat app. ", "features": ["Rooms", "  ", " Images "], "techStack": " React "}"#;
        let generator = ScriptedGenerator::with_text(vec![Ok(padded.to_string())]);
        let source = StaticSource::failing();

        let response = explain_project(&deps(&generator, None), &source, &input(None))
            .await
            .unwrap();

        assert_eq!(
            response.explanation,
            ProjectExplanation {
                summary: "A chat app.".to_string(),
                features: vec!["Rooms".to_string(), "Images".to_string()],
                tech_stack: "React".to_string(),
            }
        );
    }

    #[test]
    fn test_response_serializes_flat_camel_case() {
        let response = ExplainResponse {
            explanation: ProjectExplanation {
                summary: "s".to_string(),
                features: vec!["f".to_string()],
                tech_stack: "t".to_string(),
            },
            source: ExplainSource::ProjectPage,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["techStack"], "t");
        assert_eq!(value["source"], "project_page");
    }
}
