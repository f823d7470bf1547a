use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::RequireAdmin,
    error::{ApiError, ApiResult},
    state::AppState,
};

use super::dto::{GenreItemResponse, GenreListResponse, GenreNameRequest, GenreResponse};
use super::repo::Genre;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/genre", post(create_genre).get(list_genres))
        .route("/genre/:id", get(get_genre).put(update_genre))
}

#[instrument(skip(state, payload))]
pub async fn create_genre(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<GenreNameRequest>,
) -> ApiResult<(StatusCode, Json<GenreResponse>)> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("Genre name is required"))?
        .to_string();

    if Genre::find_by_name(&state.db, &name).await?.is_some() {
        warn!(name = %name, "duplicate genre");
        return Err(ApiError::Conflict("Genre already exists".into()));
    }

    let genre = Genre::insert(&state.db, &name).await?;
    info!(genre_id = %genre.id, name = %genre.name, "genre created");
    Ok((
        StatusCode::CREATED,
        Json(GenreResponse {
            message: "Genre created successfully".into(),
            genre,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_genres(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> ApiResult<Json<GenreListResponse>> {
    let genres = Genre::list(&state.db).await?;
    Ok(Json(GenreListResponse { genres }))
}

#[instrument(skip(state))]
pub async fn get_genre(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<GenreItemResponse>> {
    let genre = Genre::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Genre not found"))?;
    Ok(Json(GenreItemResponse { genre }))
}

#[instrument(skip(state, payload))]
pub async fn update_genre(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<GenreNameRequest>,
) -> ApiResult<Json<GenreResponse>> {
    if Genre::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::not_found("Genre not found"));
    }

    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    if let Some(ref name) = name {
        if Genre::name_in_use_by_other(&state.db, name, id).await? {
            warn!(name = %name, "genre rename collides");
            return Err(ApiError::Conflict("Genre name already in use".into()));
        }
    }

    let genre = Genre::update_name(&state.db, id, name.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("Genre not found"))?;

    info!(genre_id = %genre.id, "genre updated");
    Ok(Json(GenreResponse {
        message: "Genre updated successfully".into(),
        genre,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router().with_state(AppState::fake())
    }

    #[tokio::test]
    async fn genre_routes_require_a_session() {
        for (method, uri) in [
            ("POST", "/genre"),
            ("GET", "/genre"),
            ("GET", "/genre/5f8b1f9e-0000-0000-0000-000000000000"),
            ("PUT", "/genre/5f8b1f9e-0000-0000-0000-000000000000"),
        ] {
            let mut builder = Request::builder().method(method).uri(uri);
            let body = if method == "POST" || method == "PUT" {
                builder = builder.header("content-type", "application/json");
                Body::from("{}")
            } else {
                Body::empty()
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
