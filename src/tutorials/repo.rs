use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub youtube_url: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Tutorial {
    pub async fn list_active(db: &PgPool) -> Result<Vec<Tutorial>, sqlx::Error> {
        sqlx::query_as::<_, Tutorial>(
            r#"
            SELECT id, title, description, youtube_url, is_active, created_at, updated_at
            FROM tutorials
            WHERE is_active
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn list_all(db: &PgPool) -> Result<Vec<Tutorial>, sqlx::Error> {
        sqlx::query_as::<_, Tutorial>(
            r#"
            SELECT id, title, description, youtube_url, is_active, created_at, updated_at
            FROM tutorials
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn insert(
        db: &PgPool,
        title: &str,
        description: Option<&str>,
        youtube_url: &str,
    ) -> Result<Tutorial, sqlx::Error> {
        sqlx::query_as::<_, Tutorial>(
            r#"
            INSERT INTO tutorials (title, description, youtube_url)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, youtube_url, is_active, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(youtube_url)
        .fetch_one(db)
        .await
    }

    /// Partial update; absent fields keep their stored value.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        youtube_url: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<Tutorial>, sqlx::Error> {
        sqlx::query_as::<_, Tutorial>(
            r#"
            UPDATE tutorials
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                youtube_url = COALESCE($4, youtube_url),
                is_active = COALESCE($5, is_active),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, youtube_url, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(youtube_url)
        .bind(is_active)
        .fetch_optional(db)
        .await
    }

    /// Hard delete. Returns false when no row matched.
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tutorials WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(db: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tutorials")
            .fetch_one(db)
            .await
    }
}
