use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use super::jwt::{JwtKeys, SESSION_COOKIE};
use super::repo::{User, UserRole};
use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the session cookie to a live user record.
///
/// The token only names an email, so the account row is looked up on every
/// request; a deleted account stops authenticating immediately even while
/// its token is still unexpired.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| ApiError::Unauthenticated("Unauthorized".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|e| {
            warn!(error = %e, "session token rejected");
            ApiError::Unauthenticated("Invalid or expired token".into())
        })?;

        let user = User::find_by_email(&state.db, &claims.sub)
            .await
            .map_err(ApiError::Database)?
            .ok_or_else(|| {
                warn!(email = %claims.sub, "session for unknown account");
                ApiError::Unauthenticated("Invalid or expired token".into())
            })?;

        Ok(AuthUser(user))
    }
}

/// Admin gate layered on top of [`AuthUser`].
pub struct RequireAdmin(pub User);

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Admin {
            warn!(user_id = %user.id, "admin route refused");
            return Err(ApiError::Forbidden("Admin access required".into()));
        }
        Ok(RequireAdmin(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn guarded_app() -> Router {
        Router::new()
            .route("/private", get(|AuthUser(user): AuthUser| async move { user.email }))
            .with_state(AppState::fake())
    }

    async fn message_of(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["message"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn missing_cookie_is_unauthorized() {
        let app = guarded_app();
        let request = Request::builder()
            .uri("/private")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(message_of(response).await, "Unauthorized");
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let app = guarded_app();
        let request = Request::builder()
            .uri("/private")
            .header("cookie", "token=not-a-jwt")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(message_of(response).await, "Invalid or expired token");
    }

    #[tokio::test]
    async fn unrelated_cookie_is_unauthorized() {
        let app = guarded_app();
        let request = Request::builder()
            .uri("/private")
            .header("cookie", "session=abc; theme=dark")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(message_of(response).await, "Unauthorized");
    }
}
