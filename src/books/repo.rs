use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Book record as stored.
#[derive(Debug, Clone, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    pub genre_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Book joined with its genre for API views.
#[derive(Debug, Clone, FromRow)]
pub struct BookWithGenreRow {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub genre_id: Uuid,
    pub genre_name: String,
}

impl Book {
    pub async fn list_with_genre(db: &PgPool) -> Result<Vec<BookWithGenreRow>, sqlx::Error> {
        sqlx::query_as::<_, BookWithGenreRow>(
            r#"
            SELECT b.id, b.title, b.author, b.description, b.cover_image,
                   b.created_at, b.updated_at, g.id AS genre_id, g.name AS genre_name
            FROM books b
            JOIN genres g ON g.id = b.genre_id
            ORDER BY b.created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_with_genre(
        db: &PgPool,
        id: Uuid,
    ) -> Result<Option<BookWithGenreRow>, sqlx::Error> {
        sqlx::query_as::<_, BookWithGenreRow>(
            r#"
            SELECT b.id, b.title, b.author, b.description, b.cover_image,
                   b.created_at, b.updated_at, g.id AS genre_id, g.name AS genre_name
            FROM books b
            JOIN genres g ON g.id = b.genre_id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, description, cover_image, genre_id, created_at, updated_at
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn insert(
        db: &PgPool,
        title: &str,
        author: &str,
        description: &str,
        cover_image: &str,
        genre_id: Uuid,
    ) -> Result<Book, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, description, cover_image, genre_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, author, description, cover_image, genre_id, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(author)
        .bind(description)
        .bind(cover_image)
        .bind(genre_id)
        .fetch_one(db)
        .await
    }

    /// Partial update; absent fields keep their stored value.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: Option<&str>,
        author: Option<&str>,
        description: Option<&str>,
        cover_image: Option<&str>,
        genre_id: Option<Uuid>,
    ) -> Result<Option<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                description = COALESCE($4, description),
                cover_image = COALESCE($5, cover_image),
                genre_id = COALESCE($6, genre_id),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, author, description, cover_image, genre_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(author)
        .bind(description)
        .bind(cover_image)
        .bind(genre_id)
        .fetch_optional(db)
        .await
    }

    pub async fn count(db: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(db)
            .await
    }
}
