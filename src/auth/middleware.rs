//! Token extraction and the authentication guard

use crate::auth::AuthGate;
use crate::error::Error;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Cookie carrying the bearer token
pub const TOKEN_COOKIE: &str = "token";

/// Pull the token from the `token` cookie, falling back to an
/// `Authorization: Bearer` header. The cookie wins when both are present.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    token_from_cookie(headers).or_else(|| token_from_bearer(headers))
}

fn token_from_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value)
}

fn token_from_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Set-Cookie value carrying a freshly issued token
pub fn token_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", TOKEN_COOKIE, token);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie value that removes the token cookie
pub fn clear_token_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", TOKEN_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Middleware for requiring authentication. On success the resolved
/// `User` is available to handlers as an `Extension`.
pub async fn require_auth(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, Error> {
    let token = extract_token(req.headers()).map(str::to_owned);
    let user = gate.verify_request(token.as_deref()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
