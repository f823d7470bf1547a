use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::{AuthUser, RequireAdmin},
    books::repo::Book,
    error::{ApiError, ApiResult},
    state::AppState,
};

use super::dto::{
    CreateReviewRequest, ModerateReviewRequest, ModerationListResponse, ModerationReview,
    PublicReview, PublicReviewListResponse, ReviewResponse,
};
use super::repo::{Review, ReviewStatus};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/review/all", get(list_all_reviews))
        .route("/review/book/:book_id", get(list_book_reviews))
        .route("/review/:id", post(create_review).patch(moderate_review))
}

pub(crate) fn valid_rating(rating: i32) -> bool {
    (1..=5).contains(&rating)
}

#[instrument(skip(state, payload, user))]
pub async fn create_review(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(book_id): Path<Uuid>,
    Json(payload): Json<CreateReviewRequest>,
) -> ApiResult<(StatusCode, Json<ReviewResponse>)> {
    let (Some(rating), Some(comment)) = (payload.rating, payload.comment) else {
        return Err(ApiError::bad_request("Rating and comment are required"));
    };
    if comment.trim().is_empty() {
        return Err(ApiError::bad_request("Rating and comment are required"));
    }
    if !valid_rating(rating) {
        return Err(ApiError::bad_request("Rating must be between 1 and 5"));
    }

    if Book::find_by_id(&state.db, book_id).await?.is_none() {
        return Err(ApiError::not_found("Book not found"));
    }

    // Early check for a friendlier error; the (book, user) unique index
    // still backstops the race between two concurrent submissions.
    if Review::exists_for(&state.db, book_id, user.id).await? {
        warn!(user_id = %user.id, book_id = %book_id, "duplicate review");
        return Err(ApiError::Conflict("You already reviewed this book".into()));
    }

    let review = Review::insert(&state.db, book_id, user.id, rating, comment.trim()).await?;
    info!(review_id = %review.id, book_id = %book_id, user_id = %user.id, "review submitted");
    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse {
            message: "Review submitted and waiting for approval".into(),
            review: review.into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_book_reviews(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(book_id): Path<Uuid>,
) -> ApiResult<Json<PublicReviewListResponse>> {
    let reviews = Review::list_approved_for_book(&state.db, book_id)
        .await?
        .into_iter()
        .map(PublicReview::from)
        .collect();
    Ok(Json(PublicReviewListResponse { reviews }))
}

#[instrument(skip(state))]
pub async fn list_all_reviews(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> ApiResult<Json<ModerationListResponse>> {
    let reviews = Review::list_all(&state.db)
        .await?
        .into_iter()
        .map(ModerationReview::from)
        .collect();
    Ok(Json(ModerationListResponse { reviews }))
}

#[instrument(skip(state, payload))]
pub async fn moderate_review(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<ModerateReviewRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let Some(raw_status) = payload.status else {
        return Err(ApiError::bad_request("Status is required"));
    };
    let status: ReviewStatus = raw_status
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid review status"))?;

    let review = Review::set_status(&state.db, id, status)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    info!(review_id = %review.id, status = %status, "review moderated");
    Ok(Json(serde_json::json!({
        "message": format!("Review {}", status)
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(!valid_rating(0));
        assert!(valid_rating(1));
        assert!(valid_rating(5));
        assert!(!valid_rating(6));
        assert!(!valid_rating(-3));
    }

    fn app() -> Router {
        router().with_state(AppState::fake())
    }

    #[tokio::test]
    async fn review_routes_require_a_session() {
        let id = "5f8b1f9e-0000-0000-0000-000000000000";
        for (method, uri) in [
            ("POST", format!("/review/{id}")),
            ("GET", format!("/review/book/{id}")),
            ("GET", "/review/all".to_string()),
            ("PATCH", format!("/review/{id}")),
        ] {
            let mut builder = Request::builder().method(method).uri(&uri);
            let body = if method == "GET" {
                Body::empty()
            } else {
                builder = builder.header("content-type", "application/json");
                Body::from("{}")
            };
            let response = app().oneshot(builder.body(body).unwrap()).await.unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{method} {uri} must be gated"
            );
        }
    }
}
