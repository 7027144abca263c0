//! Credential store and revocation ledger backends

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::models::User;
use crate::config::DatabaseConfig;
use crate::error::Result;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Durable user records keyed by id, unique by email
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact-match lookup by (normalized) email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Persist a new user. Fails with `Error::DuplicateEmail` when the
    /// email is already taken, even if a prior lookup missed it.
    async fn create(&self, fullname: &str, email: &str, password_hash: &str) -> Result<User>;
}

/// A logged-out token
#[derive(Debug, Clone, PartialEq)]
pub struct RevokedToken {
    pub token: String,
    pub revoked_at: DateTime<Utc>,
    /// Natural expiry of the token, when it had one
    pub expires_at: Option<DateTime<Utc>>,
}

/// Set of tokens that must never verify again
#[async_trait]
pub trait RevocationLedger: Send + Sync {
    /// Record a token. Revoking twice is a no-op.
    async fn revoke(&self, token: &str, expires_at: Option<DateTime<Utc>>) -> Result<()>;

    async fn is_revoked(&self, token: &str) -> Result<bool>;

    /// Drop entries whose token expired before `now`; returns how many
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

/// The storage backend selected by `database.url`
#[derive(Clone)]
pub enum Backend {
    Memory(Arc<MemoryStore>),
    Postgres(Arc<PostgresStore>),
}

impl Backend {
    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        match self {
            Backend::Memory(store) => store.clone(),
            Backend::Postgres(store) => store.clone(),
        }
    }

    pub fn ledger(&self) -> Arc<dyn RevocationLedger> {
        match self {
            Backend::Memory(store) => store.clone(),
            Backend::Postgres(store) => store.clone(),
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, Backend::Memory(_))
    }

    /// Create tables if needed
    pub async fn migrate(&self) -> Result<()> {
        match self {
            Backend::Memory(_) => Ok(()),
            Backend::Postgres(store) => store.migrate().await,
        }
    }
}

/// Open the backend named by the configuration
pub async fn connect(config: &DatabaseConfig) -> Result<Backend> {
    if config.is_memory() {
        tracing::warn!("Using in-memory store; accounts are lost on restart");
        return Ok(Backend::Memory(Arc::new(MemoryStore::new())));
    }

    let store = PostgresStore::connect(config.url.trim()).await?;
    Ok(Backend::Postgres(Arc::new(store)))
}
