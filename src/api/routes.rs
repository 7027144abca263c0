//! API route handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};

use super::server::SharedState;
use crate::auth::middleware::{clear_token_cookie, extract_token, token_cookie};
use crate::auth::models::{
    AuthResponse, LoginRequest, MessageResponse, ProfileResponse, RegisterRequest, User,
};
use crate::error::{Error, Result};

fn invalid_body(rejection: JsonRejection) -> Error {
    tracing::debug!("Rejected request body: {}", rejection);
    Error::invalid_field("body", "Invalid request body")
}

pub async fn index() -> &'static str {
    "Hello World"
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(MessageResponse::new("healthy"))
}

// Account routes

pub async fn register(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload.map_err(invalid_body)?;
    let session = state.gate.register(req).await?;
    let cookie = token_cookie(&session.token, state.config.auth.cookie_secure);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse::new("User created successfully", session)),
    ))
}

pub async fn login(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload.map_err(invalid_body)?;
    let session = state.gate.login(req).await?;
    let cookie = token_cookie(&session.token, state.config.auth.cookie_secure);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse::new("Logged in successfully", session)),
    ))
}

pub async fn logout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    state.gate.logout(extract_token(&headers)).await?;

    Ok((
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            clear_token_cookie(state.config.auth.cookie_secure),
        )],
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

/// Requires `require_auth` in front of it
pub async fn profile(Extension(user): Extension<User>) -> impl IntoResponse {
    Json(ProfileResponse { user: user.into() })
}
