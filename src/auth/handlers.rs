use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            is_valid_email, LoginRequest, LoginResponse, MeResponse, RegisterRequest,
            RegisterResponse, RoleResponse,
        },
        extractors::AuthUser,
        jwt::{clear_session_cookie, session_cookie, JwtKeys},
        password::{hash_password, verify_password},
        repo::User,
    },
    error::{ApiError, ApiResult},
    images::services::{decode_image_payload, discard_image, store_image},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/logout", delete(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/user/me", get(me))
        .route("/user/me/role", get(me_role))
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<RegisterResponse>)> {
    let RegisterRequest {
        name,
        email,
        password,
        photo_file,
    } = payload;
    let (Some(name), Some(email), Some(password), Some(photo_file)) =
        (name, email, password, photo_file)
    else {
        return Err(ApiError::bad_request("All fields are required"));
    };
    let name = name.trim().to_string();
    let email = email.trim().to_string();
    if name.is_empty() || email.is_empty() || password.is_empty() || photo_file.trim().is_empty() {
        return Err(ApiError::bad_request("All fields are required"));
    }

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::bad_request("Invalid email"));
    }
    if password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::bad_request("Password too short"));
    }

    // Early check for a friendlier error; the unique index still backstops
    // the race between two concurrent registrations.
    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict("User already exist by this email".into()));
    }

    let (body, content_type) = decode_image_payload(&photo_file)
        .map_err(|e| ApiError::bad_request(format!("Invalid photo: {e}")))?;
    let photo = store_image(&state, "avatars", body, &content_type).await?;

    let password_hash = hash_password(&password)?;

    let user = match User::insert(&state.db, &name, &email, &photo.url, &password_hash).await {
        Ok(u) => u,
        Err(e) => {
            // The avatar is already in the bucket; drop it rather than leak it.
            discard_image(&state, &photo.key).await;
            return Err(ApiError::Database(e));
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user.email)?;
    let jar = jar.add(session_cookie(
        token.clone(),
        keys.ttl,
        state.config.production,
    ));

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(RegisterResponse {
            token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request("Email is required"))?;
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("Password is required"))?;

    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::wrong_credentials());
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::wrong_credentials());
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user.email)?;
    let jar = jar.add(session_cookie(token, keys.ttl, state.config.production));

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((jar, Json(LoginResponse { user: user.into() })))
}

/// Clears the session cookie. The token itself stays valid until expiry;
/// there is no server-side revocation list.
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.add(clear_session_cookie(state.config.production));
    (
        jar,
        Json(serde_json::json!({ "message": "Successfully logout" })),
    )
}

#[instrument(skip_all)]
pub async fn me(AuthUser(user): AuthUser) -> ApiResult<Json<MeResponse>> {
    Ok(Json(MeResponse { user: user.into() }))
}

#[instrument(skip_all)]
pub async fn me_role(AuthUser(user): AuthUser) -> ApiResult<Json<RoleResponse>> {
    Ok(Json(RoleResponse { role: user.role }))
}
