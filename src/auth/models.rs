//! Account models and request/response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stored user record
#[derive(Clone)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    pub fullname: String,
    /// Login key, stored lower-cased
    pub email: String,
    /// bcrypt hash; the plaintext is never kept
    pub password_hash: String,
    /// Transient realtime connection handle, unused by authentication
    pub socket_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(fullname: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            fullname,
            email,
            password_hash,
            socket_id: None,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("socket_id", &self.socket_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Public view of a user, safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname.clone(),
            email: user.email.clone(),
            socket_id: user.socket_id.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname,
            email: user.email,
            socket_id: user.socket_id,
            created_at: user.created_at,
        }
    }
}

/// Registration payload. Missing fields deserialize empty and are
/// reported by validation.
#[derive(Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login credentials
#[derive(Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A freshly issued token and the user it belongs to
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub token: String,
    pub user: User,
}

/// Register/login response with token
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

impl AuthResponse {
    pub fn new(message: impl Into<String>, session: Authenticated) -> Self {
        Self {
            message: message.into(),
            token: session.token,
            user: session.user.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
