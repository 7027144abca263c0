//! In-process store for development and tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, RevocationLedger, RevokedToken};
use crate::auth::models::User;
use crate::error::{Error, Result};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
    revoked: HashMap<String, RevokedToken>,
}

/// Users and revocations behind one lock. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn revoked_count(&self) -> usize {
        self.inner.read().await.revoked.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_email
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn create(&self, fullname: &str, email: &str, password_hash: &str) -> Result<User> {
        let mut inner = self.inner.write().await;
        if inner.by_email.contains_key(email) {
            return Err(Error::DuplicateEmail);
        }

        let user = User::new(
            fullname.to_string(),
            email.to_string(),
            password_hash.to_string(),
        );
        inner.by_email.insert(user.email.clone(), user.id);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl RevocationLedger for MemoryStore {
    async fn revoke(&self, token: &str, expires_at: Option<DateTime<Utc>>) -> Result<()> {
        self.inner
            .write()
            .await
            .revoked
            .entry(token.to_string())
            .or_insert_with(|| RevokedToken {
                token: token.to_string(),
                revoked_at: Utc::now(),
                expires_at,
            });
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool> {
        Ok(self.inner.read().await.revoked.contains_key(token))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.revoked.len();
        inner
            .revoked
            .retain(|_, entry| entry.expires_at.map_or(true, |exp| exp >= now));
        Ok((before - inner.revoked.len()) as u64)
    }
}
