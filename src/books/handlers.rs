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
    error::{ApiError, ApiResult},
    genres::repo::Genre,
    images::services::{decode_image_payload, discard_image, store_image},
    state::AppState,
};

use super::dto::{
    BookItemResponse, BookListResponse, BookResponse, BookView, CreateBookRequest,
    UpdateBookRequest,
};
use super::repo::Book;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/book", post(create_book).get(list_books))
        .route("/book/:id", get(get_book).put(update_book))
}

#[instrument(skip(state, payload))]
pub async fn create_book(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<CreateBookRequest>,
) -> ApiResult<(StatusCode, Json<BookResponse>)> {
    let CreateBookRequest {
        title,
        author,
        genre,
        description,
        cover_file,
    } = payload;
    let (Some(title), Some(author), Some(genre_id), Some(description), Some(cover_file)) =
        (title, author, genre, description, cover_file)
    else {
        return Err(ApiError::bad_request("All fields are required"));
    };
    let title = title.trim().to_string();
    let author = author.trim().to_string();
    if title.is_empty() || author.is_empty() || description.is_empty() || cover_file.trim().is_empty()
    {
        return Err(ApiError::bad_request("All fields are required"));
    }

    if Genre::find_by_id(&state.db, genre_id).await?.is_none() {
        warn!(genre_id = %genre_id, "book references missing genre");
        return Err(ApiError::not_found("Selected genre does not exist"));
    }

    let (body, content_type) = decode_image_payload(&cover_file)
        .map_err(|e| ApiError::bad_request(format!("Invalid cover: {e}")))?;
    let cover = store_image(&state, "covers", body, &content_type).await?;

    let book = match Book::insert(
        &state.db,
        &title,
        &author,
        &description,
        &cover.url,
        genre_id,
    )
    .await
    {
        Ok(b) => b,
        Err(e) => {
            discard_image(&state, &cover.key).await;
            return Err(ApiError::Database(e));
        }
    };

    let view = book_view(&state, book.id).await?;
    info!(book_id = %view.id, title = %view.title, "book created");
    Ok((
        StatusCode::CREATED,
        Json(BookResponse {
            message: "Book created successfully".into(),
            book: view,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_books(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> ApiResult<Json<BookListResponse>> {
    let books = Book::list_with_genre(&state.db)
        .await?
        .into_iter()
        .map(BookView::from)
        .collect();
    Ok(Json(BookListResponse { books }))
}

#[instrument(skip(state))]
pub async fn get_book(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BookItemResponse>> {
    let book = book_view(&state, id).await?;
    Ok(Json(BookItemResponse { book }))
}

#[instrument(skip(state, payload))]
pub async fn update_book(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookRequest>,
) -> ApiResult<Json<BookResponse>> {
    if Book::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::not_found("Book not found"));
    }

    if let Some(genre_id) = payload.genre {
        if Genre::find_by_id(&state.db, genre_id).await?.is_none() {
            warn!(genre_id = %genre_id, "book update references missing genre");
            return Err(ApiError::not_found("Selected genre does not exist"));
        }
    }

    // Replace the cover first so a failed row update leaves no dangling
    // reference; the freshly uploaded object is discarded on failure.
    let mut new_cover = None;
    if let Some(cover_file) = payload
        .cover_file
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        let (body, content_type) = decode_image_payload(cover_file)
            .map_err(|e| ApiError::bad_request(format!("Invalid cover: {e}")))?;
        new_cover = Some(store_image(&state, "covers", body, &content_type).await?);
    }

    let updated = Book::update(
        &state.db,
        id,
        payload.title.as_deref().map(str::trim),
        payload.author.as_deref().map(str::trim),
        payload.description.as_deref(),
        new_cover.as_ref().map(|c| c.url.as_str()),
        payload.genre,
    )
    .await;

    let book = match updated {
        Ok(Some(b)) => b,
        Ok(None) => {
            if let Some(cover) = new_cover {
                discard_image(&state, &cover.key).await;
            }
            return Err(ApiError::not_found("Book not found"));
        }
        Err(e) => {
            if let Some(cover) = new_cover {
                discard_image(&state, &cover.key).await;
            }
            return Err(ApiError::Database(e));
        }
    };

    let view = book_view(&state, book.id).await?;
    info!(book_id = %view.id, "book updated");
    Ok(Json(BookResponse {
        message: "Book updated successfully".into(),
        book: view,
    }))
}

async fn book_view(state: &AppState, id: Uuid) -> ApiResult<BookView> {
    Book::find_with_genre(&state.db, id)
        .await?
        .map(BookView::from)
        .ok_or_else(|| ApiError::not_found("Book not found"))
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
    async fn book_routes_require_a_session() {
        for (method, uri) in [
            ("POST", "/book"),
            ("GET", "/book"),
            ("GET", "/book/5f8b1f9e-0000-0000-0000-000000000000"),
            ("PUT", "/book/5f8b1f9e-0000-0000-0000-000000000000"),
        ] {
            let mut builder = Request::builder().method(method).uri(uri);
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
