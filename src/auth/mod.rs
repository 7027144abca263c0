//! Authentication: password hashing, tokens and the request gate

pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod validation;

pub use gate::AuthGate;
pub use jwt::{Claims, TokenIssuer, VerifiedToken};
pub use middleware::{extract_token, require_auth, TOKEN_COOKIE};
pub use models::{Authenticated, LoginRequest, RegisterRequest, User, UserInfo};
pub use password::PasswordHasher;
