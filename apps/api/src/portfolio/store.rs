//! Projects and skills persistence.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::portfolio::models::{Project, ProjectInput};

pub async fn list_projects(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at, id")
        .fetch_all(pool)
        .await
}

pub async fn get_project(pool: &PgPool, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_project(pool: &PgPool, input: &ProjectInput) -> Result<Project, sqlx::Error> {
    let project = sqlx::query_as::<_, Project>(
        r#"
        INSERT INTO projects (id, title, description, image, tags, link, ai_hint)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.image)
    .bind(&input.tags)
    .bind(&input.link)
    .bind(&input.ai_hint)
    .fetch_one(pool)
    .await?;

    info!("Created project {} ({})", project.id, project.title);
    Ok(project)
}

/// Returns `None` when no project has this id.
pub async fn update_project(
    pool: &PgPool,
    id: Uuid,
    input: &ProjectInput,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        r#"
        UPDATE projects
        SET title = $2, description = $3, image = $4, tags = $5, link = $6, ai_hint = $7,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.image)
    .bind(&input.tags)
    .bind(&input.link)
    .bind(&input.ai_hint)
    .fetch_optional(pool)
    .await
}

/// Returns false when no project had this id.
pub async fn delete_project(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// `None` until skills have been stored once.
pub async fn get_skills(pool: &PgPool) -> Result<Option<Vec<String>>, sqlx::Error> {
    sqlx::query_scalar::<_, Vec<String>>("SELECT list FROM skills WHERE id = 1")
        .fetch_optional(pool)
        .await
}

pub async fn put_skills(pool: &PgPool, list: &[String]) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO skills (id, list) VALUES (1, $1)
        ON CONFLICT (id) DO UPDATE SET list = EXCLUDED.list, updated_at = now()
        "#,
    )
    .bind(list)
    .execute(pool)
    .await?;
    Ok(())
}
