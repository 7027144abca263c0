//! JWT token handling

use crate::config::AuthConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Token ID, makes every issued token a distinct string
    pub jti: String,
    /// Expiration time, absent for long-lived tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Create claims for a user, optionally expiring after `ttl`
    pub fn new(user_id: Uuid, ttl: Option<chrono::Duration>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            exp: ttl.map(|ttl| (now + ttl).timestamp()),
        }
    }

    /// A token is live only while `exp` is in the future. Tokens without
    /// `exp` never expire.
    pub fn is_expired(&self) -> bool {
        self.exp.is_some_and(|exp| exp <= Utc::now().timestamp())
    }
}

/// What a valid token asserts
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Signs and verifies bearer tokens with a process-wide HS256 secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<chrono::Duration>,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Option<chrono::Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is optional; when present it is enforced without leeway
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        if config.jwt_secret.is_empty() {
            return Err(Error::Config("auth.jwt_secret is required".to_string()));
        }
        Ok(Self::new(config.jwt_secret.as_bytes(), config.token_ttl()))
    }

    /// Issue a token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        self.sign(&Claims::new(user_id, self.ttl))
    }

    /// Sign arbitrary claims with this issuer's key
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        Ok(encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding,
        )?)
    }

    /// Validate a token. Every failure (signature, format, expiry, subject)
    /// collapses into `Error::Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                Error::Unauthorized
            })?;

        // jsonwebtoken still accepts the expiry second itself
        if claims.is_expired() {
            tracing::debug!("Token rejected: expired");
            return Err(Error::Unauthorized);
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| Error::Unauthorized)?;
        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(Error::Unauthorized)?;
        let expires_at = match claims.exp {
            Some(exp) => Some(DateTime::from_timestamp(exp, 0).ok_or(Error::Unauthorized)?),
            None => None,
        };

        Ok(VerifiedToken {
            user_id,
            issued_at,
            expires_at,
        })
    }
}
