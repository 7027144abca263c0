//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Token and password settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    #[serde(default)]
    pub jwt_secret: String,

    /// Lifetime of issued tokens. When unset tokens carry no expiry.
    #[serde(default)]
    pub token_ttl_secs: Option<u64>,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Mark the `token` cookie as Secure
    #[serde(default)]
    pub cookie_secure: bool,
}

fn default_bcrypt_cost() -> u32 {
    10
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: None,
            bcrypt_cost: default_bcrypt_cost(),
            cookie_secure: false,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

impl AuthConfig {
    pub fn token_ttl(&self) -> Option<chrono::Duration> {
        self.token_ttl_secs
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(chrono::Duration::try_seconds)
    }
}

pub const MEMORY_URL: &str = "memory://";

/// Storage connection settings
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// `memory://` or a PostgreSQL connection string
    #[serde(default)]
    pub url: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Connection strings usually embed a password
        let url = if self.is_memory() { MEMORY_URL } else { "<redacted>" };
        f.debug_struct("DatabaseConfig").field("url", &url).finish()
    }
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url.trim() == MEMORY_URL
    }
}

impl Config {
    /// Configuration backed by the in-process store
    pub fn ephemeral(jwt_secret: impl Into<String>) -> Self {
        Self {
            auth: AuthConfig {
                jwt_secret: jwt_secret.into(),
                ..AuthConfig::default()
            },
            database: DatabaseConfig {
                url: MEMORY_URL.to_string(),
            },
            ..Config::default()
        }
    }

    /// Check the settings the service cannot start without
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(Error::Config(
                "auth.jwt_secret is required (set JWT_SECRET_KEY)".to_string(),
            ));
        }

        if self.database.url.trim().is_empty() {
            return Err(Error::Config(
                "database.url is required (set DB_URI)".to_string(),
            ));
        }

        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(Error::Config(format!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }

        if self.auth.token_ttl_secs == Some(0) {
            return Err(Error::Config(
                "auth.token_ttl_secs must be positive when set".to_string(),
            ));
        }

        Ok(())
    }
}
