use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub tags: Vec<String>,
    pub link: String,
    pub ai_hint: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of create/update requests. Everything but title and description is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub ai_hint: String,
}

impl ProjectInput {
    /// Trims all fields, cleans the tag list and rejects blank title/description.
    pub fn validated(self) -> Result<Self, AppError> {
        let title = self.title.trim().to_string();
        let description = self.description.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        if description.is_empty() {
            return Err(AppError::Validation(
                "description cannot be empty".to_string(),
            ));
        }
        Ok(ProjectInput {
            title,
            description,
            image: self.image.trim().to_string(),
            tags: dedupe_labels(&self.tags),
            link: self.link.trim().to_string(),
            ai_hint: self.ai_hint.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsList {
    pub list: Vec<String>,
}

impl SkillsList {
    pub fn validated(self) -> Result<Self, AppError> {
        let list = dedupe_labels(&self.list);
        if list.is_empty() {
            return Err(AppError::Validation(
                "skills list cannot be empty".to_string(),
            ));
        }
        Ok(SkillsList { list })
    }
}

/// Trims labels, drops blanks and removes case-insensitive duplicates.
/// The first spelling of a label wins and order is preserved.
pub fn dedupe_labels(labels: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .map(|label| label.trim())
        .filter(|label| !label.is_empty())
        .filter(|label| seen.insert(label.to_lowercase()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, description: &str, tags: &[&str]) -> ProjectInput {
        ProjectInput {
            title: title.to_string(),
            description: description.to_string(),
            image: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            link: " https://example.com ".to_string(),
            ai_hint: String::new(),
        }
    }

    #[test]
    fn test_dedupe_labels_preserves_first_spelling_and_order() {
        let labels: Vec<String> = ["Next.js", " React ", "next.js", "", "react", "Firebase"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(dedupe_labels(&labels), vec!["Next.js", "React", "Firebase"]);
    }

    #[test]
    fn test_project_input_validated_trims() {
        let cleaned = input("  Chat App ", " Realtime chat ", &["Rust", "rust"])
            .validated()
            .unwrap();
        assert_eq!(cleaned.title, "Chat App");
        assert_eq!(cleaned.description, "Realtime chat");
        assert_eq!(cleaned.tags, vec!["Rust"]);
        assert_eq!(cleaned.link, "https://example.com");
    }

    #[test]
    fn test_project_input_rejects_blank_title() {
        assert!(matches!(
            input("   ", "desc", &[]).validated(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_project_input_deserializes_camel_case_with_defaults() {
        let json = r#"{"title": "Folio", "description": "Portfolio", "aiHint": "laptop code"}"#;
        let parsed: ProjectInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.ai_hint, "laptop code");
        assert!(parsed.tags.is_empty());
        assert!(parsed.link.is_empty());
    }

    #[test]
    fn test_project_serializes_camel_case() {
        let project = Project {
            id: Uuid::new_v4(),
            title: "Folio".to_string(),
            description: "Portfolio".to_string(),
            image: "https://placehold.co/600x400.png".to_string(),
            tags: vec!["Rust".to_string()],
            link: String::new(),
            ai_hint: "code screen".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["aiHint"], "code screen");
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_skills_list_rejects_empty() {
        let skills = SkillsList {
            list: vec!["  ".to_string()],
        };
        assert!(skills.validated().is_err());
    }
}
