use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{Review, ReviewModerationRow, ReviewStatus, ReviewWithAuthorRow};

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModerateReviewRequest {
    pub status: Option<String>,
}

/// Review as returned right after submission; references stay raw ids.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntity {
    pub id: Uuid,
    pub book: Uuid,
    pub user: Uuid,
    pub rating: i32,
    pub comment: String,
    pub status: ReviewStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Review> for ReviewEntity {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            book: r.book_id,
            user: r.user_id,
            rating: r.rating,
            comment: r.comment,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewAuthor {
    pub id: Uuid,
    pub name: String,
}

/// Approved review in the public listing, author name populated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicReview {
    pub id: Uuid,
    pub book: Uuid,
    pub user: ReviewAuthor,
    pub rating: i32,
    pub comment: String,
    pub status: ReviewStatus,
    pub created_at: OffsetDateTime,
}

impl From<ReviewWithAuthorRow> for PublicReview {
    fn from(r: ReviewWithAuthorRow) -> Self {
        Self {
            id: r.id,
            book: r.book_id,
            user: ReviewAuthor {
                id: r.user_id,
                name: r.user_name,
            },
            rating: r.rating,
            comment: r.comment,
            status: r.status,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModerationAuthor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ModerationBook {
    pub id: Uuid,
    pub title: String,
}

/// Review in the moderation queue, author and book populated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationReview {
    pub id: Uuid,
    pub user: ModerationAuthor,
    pub book: ModerationBook,
    pub rating: i32,
    pub comment: String,
    pub status: ReviewStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<ReviewModerationRow> for ModerationReview {
    fn from(r: ReviewModerationRow) -> Self {
        Self {
            id: r.id,
            user: ModerationAuthor {
                id: r.user_id,
                name: r.user_name,
                email: r.user_email,
            },
            book: ModerationBook {
                id: r.book_id,
                title: r.book_title,
            },
            rating: r.rating,
            comment: r.comment,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub message: String,
    pub review: ReviewEntity,
}

#[derive(Debug, Serialize)]
pub struct PublicReviewListResponse {
    pub reviews: Vec<PublicReview>,
}

#[derive(Debug, Serialize)]
pub struct ModerationListResponse {
    pub reviews: Vec<ModerationReview>,
}
