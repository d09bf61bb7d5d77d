//! Resume inputs: the owner's static profile plus live projects and skills.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{error, warn};

use crate::portfolio::models::Project;
use crate::portfolio::store;

const EXAMPLE_PROFILE: &str = include_str!("../../profile.example.json");

/// Skills shown before any have been stored.
pub const DEFAULT_SKILLS: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "React",
    "Next.js",
    "Node.js",
    "GraphQL",
    "PostgreSQL",
    "Prisma",
    "Tailwind CSS",
    "Figma",
    "Firebase",
];

pub fn default_skills() -> Vec<String> {
    DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub college: String,
    pub duration: String,
    pub cgpa: String,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpokenLanguage {
    pub language: String,
    pub proficiency: String,
}

/// Personal details that do not live in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerProfile {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub github: String,
    pub linkedin: String,
    pub website: String,
    pub summary: String,
    pub education: Education,
    #[serde(default)]
    pub languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl OwnerProfile {
    /// Reads the profile JSON at `path`, or the bundled example when `path` is `None`.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read profile file '{path}'"))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Profile file '{path}' is not valid profile JSON"))
            }
            None => {
                warn!("PROFILE_PATH not set, using the bundled example profile");
                serde_json::from_str(EXAMPLE_PROFILE).context("Bundled example profile is invalid")
            }
        }
    }
}

/// The subset of a project a resume needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeProject {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub link: String,
}

impl From<Project> for ResumeProject {
    fn from(p: Project) -> Self {
        ResumeProject {
            title: p.title,
            description: p.description,
            tags: p.tags,
            link: p.link,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileData {
    pub skills: Vec<String>,
    pub projects: Vec<ResumeProject>,
}

/// Loads skills and projects for resume generation. Never fails: store errors
/// degrade to the default skills and an empty project list.
pub async fn load_profile_data(pool: &PgPool) -> ProfileData {
    let skills = match store::get_skills(pool).await {
        Ok(Some(list)) if !list.is_empty() => list,
        Ok(_) => default_skills(),
        Err(e) => {
            error!("Error fetching skills for resume generation: {e}");
            default_skills()
        }
    };

    let projects = match store::list_projects(pool).await {
        Ok(projects) => unique_by_title(projects),
        Err(e) => {
            error!("Error fetching projects for resume generation: {e}");
            Vec::new()
        }
    };

    ProfileData { skills, projects }
}

/// Keeps the first project for each title so the resume has no duplicates.
pub fn unique_by_title(projects: Vec<Project>) -> Vec<ResumeProject> {
    let mut seen = std::collections::HashSet::new();
    projects
        .into_iter()
        .filter(|p| seen.insert(p.title.clone()))
        .map(ResumeProject::from)
        .collect()
}
