use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Genre {
    pub async fn list(db: &PgPool) -> Result<Vec<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM genres
            ORDER BY name ASC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM genres
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_name(db: &PgPool, name: &str) -> Result<Option<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM genres
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(db)
        .await
    }

    /// True when another genre already claims this name. Renaming a genre
    /// to its current name is not a conflict.
    pub async fn name_in_use_by_other(
        db: &PgPool,
        name: &str,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM genres WHERE name = $1 AND id <> $2)",
        )
        .bind(name)
        .bind(id)
        .fetch_one(db)
        .await
    }

    pub async fn insert(db: &PgPool, name: &str) -> Result<Genre, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            r#"
            INSERT INTO genres (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(db)
        .await
    }

    pub async fn update_name(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
    ) -> Result<Option<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            r#"
            UPDATE genres
            SET name = COALESCE($2, name), updated_at = now()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(db)
        .await
    }

    pub async fn count(db: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM genres")
            .fetch_one(db)
            .await
    }
}
