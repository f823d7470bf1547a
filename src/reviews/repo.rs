use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "review_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, thiserror::Error)]
#[error("unrecognized review status")]
pub struct InvalidReviewStatus;

impl FromStr for ReviewStatus {
    type Err = InvalidReviewStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("pending") {
            Ok(ReviewStatus::Pending)
        } else if s.eq_ignore_ascii_case("approved") {
            Ok(ReviewStatus::Approved)
        } else if s.eq_ignore_ascii_case("rejected") {
            Ok(ReviewStatus::Rejected)
        } else {
            Err(InvalidReviewStatus)
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Review record as stored.
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub status: ReviewStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Review joined with the author's name for the public listing.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewWithAuthorRow {
    pub id: Uuid,
    pub book_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub status: ReviewStatus,
    pub created_at: OffsetDateTime,
    pub user_id: Uuid,
    pub user_name: String,
}

/// Review joined with author and book for the moderation queue.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewModerationRow {
    pub id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub status: ReviewStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub book_id: Uuid,
    pub book_title: String,
}

impl Review {
    pub async fn exists_for(
        db: &PgPool,
        book_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE book_id = $1 AND user_id = $2)",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_one(db)
        .await
    }

    /// Insert a review in the pending state. The (book, user) unique index
    /// turns a concurrent duplicate into a database error the caller maps
    /// to a conflict.
    pub async fn insert(
        db: &PgPool,
        book_id: Uuid,
        user_id: Uuid,
        rating: i32,
        comment: &str,
    ) -> Result<Review, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (book_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, book_id, user_id, rating, comment, status, created_at, updated_at
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(db)
        .await
    }

    pub async fn list_approved_for_book(
        db: &PgPool,
        book_id: Uuid,
    ) -> Result<Vec<ReviewWithAuthorRow>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithAuthorRow>(
            r#"
            SELECT r.id, r.book_id, r.rating, r.comment, r.status, r.created_at,
                   u.id AS user_id, u.name AS user_name
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.book_id = $1 AND r.status = $2
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(book_id)
        .bind(ReviewStatus::Approved)
        .fetch_all(db)
        .await
    }

    pub async fn list_all(db: &PgPool) -> Result<Vec<ReviewModerationRow>, sqlx::Error> {
        sqlx::query_as::<_, ReviewModerationRow>(
            r#"
            SELECT r.id, r.rating, r.comment, r.status, r.created_at, r.updated_at,
                   u.id AS user_id, u.name AS user_name, u.email AS user_email,
                   b.id AS book_id, b.title AS book_title
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            JOIN books b ON b.id = r.book_id
            ORDER BY r.created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn set_status(
        db: &PgPool,
        id: Uuid,
        status: ReviewStatus,
    ) -> Result<Option<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, book_id, user_id, rating, comment, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(db)
        .await
    }

    pub async fn count(db: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews")
            .fetch_one(db)
            .await
    }
}
