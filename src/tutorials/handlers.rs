use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::{AuthUser, RequireAdmin},
    error::{ApiError, ApiResult},
    state::AppState,
};

use super::dto::{
    CreateTutorialRequest, TutorialListResponse, TutorialResponse, UpdateTutorialRequest,
};
use super::repo::Tutorial;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tutorial", post(create_tutorial).get(list_tutorials))
        .route("/tutorial/admin/all", get(list_all_tutorials))
        .route(
            "/tutorial/:id",
            put(update_tutorial).delete(delete_tutorial),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_tutorial(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<CreateTutorialRequest>,
) -> ApiResult<(StatusCode, Json<TutorialResponse>)> {
    let (Some(title), Some(youtube_url)) = (payload.title, payload.youtube_url) else {
        return Err(ApiError::bad_request("Title and youtubeUrl are required"));
    };
    let title = title.trim().to_string();
    if title.is_empty() || youtube_url.trim().is_empty() {
        return Err(ApiError::bad_request("Title and youtubeUrl are required"));
    }

    let tutorial = Tutorial::insert(
        &state.db,
        &title,
        payload.description.as_deref().map(str::trim),
        &youtube_url,
    )
    .await?;

    info!(tutorial_id = %tutorial.id, "tutorial created");
    Ok((
        StatusCode::CREATED,
        Json(TutorialResponse {
            message: "Tutorial video added successfully".into(),
            tutorial,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_tutorials(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> ApiResult<Json<TutorialListResponse>> {
    let tutorials = Tutorial::list_active(&state.db).await?;
    Ok(Json(TutorialListResponse { tutorials }))
}

#[instrument(skip(state))]
pub async fn list_all_tutorials(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> ApiResult<Json<TutorialListResponse>> {
    let tutorials = Tutorial::list_all(&state.db).await?;
    Ok(Json(TutorialListResponse { tutorials }))
}

#[instrument(skip(state, payload))]
pub async fn update_tutorial(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTutorialRequest>,
) -> ApiResult<Json<TutorialResponse>> {
    let tutorial = Tutorial::update(
        &state.db,
        id,
        payload.title.as_deref().map(str::trim),
        payload.description.as_deref(),
        payload.youtube_url.as_deref(),
        payload.is_active,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Tutorial not found"))?;

    info!(tutorial_id = %tutorial.id, "tutorial updated");
    Ok(Json(TutorialResponse {
        message: "Tutorial updated successfully".into(),
        tutorial,
    }))
}

#[instrument(skip(state))]
pub async fn delete_tutorial(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    if !Tutorial::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Tutorial not found"));
    }
    info!(tutorial_id = %id, "tutorial deleted");
    Ok(Json(serde_json::json!({
        "message": "Tutorial deleted successfully"
    })))
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
    async fn tutorial_routes_require_a_session() {
        let id = "5f8b1f9e-0000-0000-0000-000000000000";
        for (method, uri) in [
            ("POST", "/tutorial".to_string()),
            ("GET", "/tutorial".to_string()),
            ("GET", "/tutorial/admin/all".to_string()),
            ("PUT", format!("/tutorial/{id}")),
            ("DELETE", format!("/tutorial/{id}")),
        ] {
            let mut builder = Request::builder().method(method).uri(&uri);
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
