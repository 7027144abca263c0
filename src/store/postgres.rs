//! PostgreSQL-backed credential store and revocation ledger

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::{error::SqlState, Client, NoTls, Row};
use uuid::Uuid;

use super::{CredentialStore, RevocationLedger};
use crate::auth::models::User;
use crate::error::{Error, Result};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            UUID PRIMARY KEY,
    fullname      VARCHAR(50)  NOT NULL,
    email         VARCHAR(254) NOT NULL,
    password_hash TEXT         NOT NULL,
    socket_id     TEXT,
    created_at    TIMESTAMPTZ  NOT NULL DEFAULT now(),
    CONSTRAINT users_email_key UNIQUE (email)
);

CREATE TABLE IF NOT EXISTS revoked_tokens (
    token      TEXT PRIMARY KEY,
    revoked_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    expires_at TIMESTAMPTZ
);

CREATE INDEX IF NOT EXISTS revoked_tokens_expires_at_idx
    ON revoked_tokens (expires_at)
    WHERE expires_at IS NOT NULL;
"#;

const USER_COLUMNS: &str = "id, fullname, email, password_hash, socket_id, created_at";

/// Reported to the server as `application_name` on every session
pub const APPLICATION_NAME: &str = "passage";

pub struct PostgresStore {
    config: tokio_postgres::Config,
    client: RwLock<Arc<Client>>,
}

async fn open(config: &tokio_postgres::Config) -> Result<Client> {
    let (client, connection) = config.connect(NoTls).await?;

    // Spawn the connection handler
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("PostgreSQL connection error: {}", e);
        }
    });

    Ok(client)
}

impl PostgresStore {
    /// Connect using a `postgres://` URL or libpq key/value string
    pub async fn connect(url: &str) -> Result<Self> {
        let mut config: tokio_postgres::Config = url.parse()?;
        config.application_name(APPLICATION_NAME);

        let client = open(&config).await?;
        tracing::info!("Connected to PostgreSQL");

        Ok(Self {
            config,
            client: RwLock::new(Arc::new(client)),
        })
    }

    /// The live client, reopening the session if the server dropped it
    async fn client(&self) -> Result<Arc<Client>> {
        {
            let client = self.client.read().await;
            if !client.is_closed() {
                return Ok(client.clone());
            }
        }

        let mut client = self.client.write().await;
        // Another task may have reconnected while we waited for the lock
        if client.is_closed() {
            tracing::warn!("PostgreSQL connection lost, reconnecting");
            *client = Arc::new(open(&self.config).await?);
            tracing::info!("Reconnected to PostgreSQL");
        }
        Ok(client.clone())
    }

    pub async fn migrate(&self) -> Result<()> {
        self.client().await?.batch_execute(SCHEMA).await?;
        tracing::info!("Database schema is up to date");
        Ok(())
    }
}

fn user_from_row(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        fullname: row.try_get("fullname")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        socket_id: row.try_get("socket_id")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl CredentialStore for PostgresStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let client = self.client().await?;
        client
            .query_opt(&query, &[&email])
            .await?
            .as_ref()
            .map(user_from_row)
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let client = self.client().await?;
        client
            .query_opt(&query, &[&id])
            .await?
            .as_ref()
            .map(user_from_row)
            .transpose()
    }

    async fn create(&self, fullname: &str, email: &str, password_hash: &str) -> Result<User> {
        let user = User::new(
            fullname.to_string(),
            email.to_string(),
            password_hash.to_string(),
        );

        let result = self
            .client()
            .await?
            .execute(
                "INSERT INTO users (id, fullname, email, password_hash, socket_id, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &user.id,
                    &user.fullname,
                    &user.email,
                    &user.password_hash,
                    &user.socket_id,
                    &user.created_at,
                ],
            )
            .await;

        match result {
            Ok(_) => Ok(user),
            // Lost a registration race: the unique constraint is authoritative
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => Err(Error::DuplicateEmail),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl RevocationLedger for PostgresStore {
    async fn revoke(&self, token: &str, expires_at: Option<DateTime<Utc>>) -> Result<()> {
        self.client()
            .await?
            .execute(
                "INSERT INTO revoked_tokens (token, revoked_at, expires_at) VALUES ($1, $2, $3) \
                 ON CONFLICT (token) DO NOTHING",
                &[&token, &Utc::now(), &expires_at],
            )
            .await?;
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool> {
        let row = self
            .client()
            .await?
            .query_one(
                "SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token = $1)",
                &[&token],
            )
            .await?;
        Ok(row.try_get(0)?)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let removed = self
            .client()
            .await?
            .execute(
                "DELETE FROM revoked_tokens WHERE expires_at IS NOT NULL AND expires_at < $1",
                &[&now],
            )
            .await?;
        Ok(removed)
    }
}
