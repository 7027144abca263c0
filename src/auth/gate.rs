//! Registration, login, logout and per-request verification

use chrono::Utc;
use std::sync::Arc;

use crate::auth::jwt::TokenIssuer;
use crate::auth::models::{Authenticated, LoginRequest, RegisterRequest, User};
use crate::auth::password::PasswordHasher;
use crate::auth::validation;
use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::store::{CredentialStore, RevocationLedger};

/// Composes the credential store, hasher, token issuer and revocation
/// ledger. Cheap to clone; clones share the same stores.
#[derive(Clone)]
pub struct AuthGate {
    credentials: Arc<dyn CredentialStore>,
    ledger: Arc<dyn RevocationLedger>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AuthGate {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        ledger: Arc<dyn RevocationLedger>,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            credentials,
            ledger,
            hasher,
            tokens,
        }
    }

    pub fn from_config(
        config: &AuthConfig,
        credentials: Arc<dyn CredentialStore>,
        ledger: Arc<dyn RevocationLedger>,
    ) -> Result<Self> {
        Ok(Self::new(
            credentials,
            ledger,
            PasswordHasher::new(config.bcrypt_cost)?,
            TokenIssuer::from_config(config)?,
        ))
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Create an account and issue its first token
    pub async fn register(&self, req: RegisterRequest) -> Result<Authenticated> {
        validation::validate_registration(&req)?;

        let RegisterRequest {
            fullname,
            email,
            password,
        } = req;
        let email = validation::normalize_email(&email);

        // Fast path only; the store's uniqueness constraint has the final say
        if self.credentials.find_by_email(&email).await?.is_some() {
            return Err(Error::DuplicateEmail);
        }

        let password_hash = self.hasher.hash_blocking(password).await?;
        let user = self
            .credentials
            .create(fullname.trim(), &email, &password_hash)
            .await?;
        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "Registered user {}", user.email);
        Ok(Authenticated { token, user })
    }

    /// Exchange credentials for a token. Unknown email and wrong password
    /// both yield `InvalidCredentials`.
    pub async fn login(&self, req: LoginRequest) -> Result<Authenticated> {
        validation::validate_login(&req)?;

        let LoginRequest { email, password } = req;
        let email = validation::normalize_email(&email);

        let Some(user) = self.credentials.find_by_email(&email).await? else {
            tracing::debug!("Login failed: unknown email");
            return Err(Error::InvalidCredentials);
        };

        if !self
            .hasher
            .verify_blocking(password, user.password_hash.clone())
            .await?
        {
            tracing::debug!(user_id = %user.id, "Login failed: password mismatch");
            return Err(Error::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(Authenticated { token, user })
    }

    /// Revoke a token. Malformed or already revoked tokens are accepted.
    pub async fn logout(&self, token: Option<&str>) -> Result<()> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(());
        };

        let expires_at = self.tokens.verify(token).ok().and_then(|v| v.expires_at);
        self.ledger.revoke(token, expires_at).await?;

        tracing::info!("Token revoked");
        Ok(())
    }

    /// Resolve the user behind a presented token. Every rejection is the
    /// same `Unauthorized`; only storage failures surface differently.
    pub async fn verify_request(&self, token: Option<&str>) -> Result<User> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(Error::Unauthorized)?;

        if self.ledger.is_revoked(token).await? {
            tracing::debug!("Rejected revoked token");
            return Err(Error::Unauthorized);
        }

        let verified = self.tokens.verify(token)?;

        match self.credentials.find_by_id(verified.user_id).await? {
            Some(user) => Ok(user),
            None => {
                tracing::debug!(user_id = %verified.user_id, "Token subject no longer exists");
                Err(Error::Unauthorized)
            }
        }
    }

    /// Sweep ledger entries for tokens past their natural expiry
    pub async fn prune_revocations(&self) -> Result<u64> {
        self.ledger.purge_expired(Utc::now()).await
    }
}
