use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::extractors::RequireAdmin,
    auth::repo::User,
    books::repo::Book,
    error::ApiResult,
    genres::repo::Genre,
    reviews::repo::Review,
    state::AppState,
    tutorials::repo::Tutorial,
};

use super::dto::{StatsData, StatsResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(dashboard_stats))
}

/// Aggregate counts for the admin dashboard, gathered in one round of
/// concurrent queries.
#[instrument(skip(state))]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> ApiResult<Json<StatsResponse>> {
    let (books, users, reviews, genres, tutorials) = tokio::try_join!(
        Book::count(&state.db),
        User::count(&state.db),
        Review::count(&state.db),
        Genre::count(&state.db),
        Tutorial::count(&state.db),
    )?;

    Ok(Json(StatsResponse {
        success: true,
        data: StatsData {
            books,
            users,
            reviews,
            genres,
            tutorials,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn stats_require_a_session() {
        let app = router().with_state(AppState::fake());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
