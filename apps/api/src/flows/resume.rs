//! Resume: a one-page HTML resume built from the owner's profile, skills and projects.
//!
//! Defaults to placeholder mode: a terminal failure yields a short HTML error
//! block so the client can render something.

use serde::Serialize;

use crate::flows::prompts::{RESUME_FAILED_HTML, RESUME_PROMPT_TEMPLATE};
use crate::flows::FlowDeps;
use crate::llm_client::prompts::{join_bullets, join_inline, HTML_ONLY_SYSTEM, NO_INVENTION_INSTRUCTION};
use crate::portfolio::profile::{OwnerProfile, ProfileData, ResumeProject};
use crate::resilience::normalize::normalize_text;
use crate::resilience::{FailureMode, GenerationFailure};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeResponse {
    pub html: String,
}

pub fn build_resume_prompt(profile: &OwnerProfile, data: &ProfileData) -> String {
    let education = &profile.education;
    let languages: Vec<String> = profile
        .languages
        .iter()
        .map(|l| format!("{} ({})", l.language, l.proficiency))
        .collect();

    RESUME_PROMPT_TEMPLATE
        .replace("{no_invention_instruction}", NO_INVENTION_INSTRUCTION)
        .replace("{name}", &profile.name)
        .replace("{title}", &profile.title)
        .replace("{email}", &profile.email)
        .replace("{phone}", &profile.phone)
        .replace("{location}", &profile.location)
        .replace("{github}", &profile.github)
        .replace("{linkedin}", &profile.linkedin)
        .replace("{website}", &profile.website)
        .replace("{summary}", &profile.summary)
        .replace("{degree}", &education.degree)
        .replace("{college}", &education.college)
        .replace("{duration}", &education.duration)
        .replace("{cgpa}", &education.cgpa)
        .replace("{education_notes}", &join_bullets(&education.notes))
        .replace("{skills}", &join_inline(&data.skills))
        .replace("{projects}", &render_projects(&data.projects))
        .replace("{languages}", &join_bullets(&languages))
        .replace("{interests}", &join_inline(&profile.interests))
}

fn render_projects(projects: &[ResumeProject]) -> String {
    if projects.is_empty() {
        return "(none listed)".to_string();
    }
    projects
        .iter()
        .map(|p| {
            format!(
                "- {} | {} | Tech: {} | Link: {}",
                p.title,
                p.description,
                join_inline(&p.tags),
                p.link
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn generate_resume_html(
    deps: &FlowDeps<'_>,
    prompt: &str,
) -> Result<ResumeResponse, GenerationFailure> {
    let html = deps
        .invoker
        .invoke_settled(
            "generate_resume",
            || deps.generator.generate_text(prompt, HTML_ONLY_SYSTEM),
            |raw: String| normalize_text(&raw),
            deps.mode_or(FailureMode::Placeholder),
            |_| RESUME_FAILED_HTML.to_string(),
        )
        .await?;

    Ok(ResumeResponse { html })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::{busy, deps, ScriptedGenerator};

    fn profile_data() -> ProfileData {
        ProfileData {
            skills: vec!["Rust".to_string(), "Postgres".to_string()],
            projects: vec![ResumeProject {
                title: "Folio".to_string(),
                description: "Portfolio site".to_string(),
                tags: vec!["Axum".to_string()],
                link: "https://folio.example".to_string(),
            }],
        }
    }

    #[test]
    fn test_prompt_fills_every_placeholder() {
        let profile = OwnerProfile::load(None).unwrap();
        let prompt = build_resume_prompt(&profile, &profile_data());

        assert!(prompt.contains(&profile.name));
        assert!(prompt.contains(&profile.education.college));
        assert!(prompt.contains("Rust, Postgres"));
        assert!(prompt.contains("- Folio | Portfolio site | Tech: Axum | Link: https://folio.example"));
        assert!(prompt.contains("Use ONLY the information provided"));
        for placeholder in ["{name}", "{skills}", "{projects}", "{languages}", "{education_notes}"] {
            assert!(!prompt.contains(placeholder), "{placeholder} left unfilled");
        }
    }

    #[test]
    fn test_prompt_without_projects() {
        let profile = OwnerProfile::load(None).unwrap();
        let data = ProfileData {
            skills: vec![],
            projects: vec![],
        };
        assert!(build_resume_prompt(&profile, &data).contains("(none listed)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_html_fence_is_stripped() {
        let raw = "```html\n<div class=\"resume-container\"><h1>Alex</h1></div>\n```";
        let generator = ScriptedGenerator::with_text(vec![Ok(raw.to_string())]);

        let response = generate_resume_html(&deps(&generator, None), "prompt").await.unwrap();

        assert_eq!(response.html, "<div class=\"resume-container\"><h1>Alex</h1></div>");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_failure_html() {
        let generator = ScriptedGenerator::with_text(vec![Err(busy()), Ok("   ".to_string()), Err(busy())]);

        let response = generate_resume_html(&deps(&generator, None), "prompt").await.unwrap();

        assert_eq!(generator.calls(), 3);
        assert_eq!(response.html, RESUME_FAILED_HTML);
    }

    #[tokio::test(start_paused = true)]
    async fn test_propagate_override() {
        let generator = ScriptedGenerator::with_text(vec![Err(busy()), Err(busy()), Err(busy())]);

        let failure = generate_resume_html(&deps(&generator, Some(FailureMode::Propagate)), "prompt")
            .await
            .unwrap_err();

        assert!(failure.is_service_busy());
    }
}
