//! Password hashing with bcrypt

use crate::error::{Error, Result};

/// Salted adaptive hasher. bcrypt picks a fresh salt per call and embeds
/// it, with the cost, in the returned hash string.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self> {
        if !(4..=31).contains(&cost) {
            return Err(Error::Config(format!(
                "bcrypt cost must be between 4 and 31, got {}",
                cost
            )));
        }
        Ok(Self { cost })
    }

    /// Hash a plaintext password. Input longer than bcrypt's 72 bytes is
    /// refused rather than silently truncated.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(bcrypt::non_truncating_hash(plaintext, self.cost)?)
    }

    /// Check a candidate against a stored hash using bcrypt's own comparison.
    /// A candidate past 72 bytes can never match a stored hash.
    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<bool> {
        match bcrypt::non_truncating_verify(plaintext, hash) {
            Err(bcrypt::BcryptError::Truncation(_)) => Ok(false),
            result => Ok(result?),
        }
    }

    /// `hash` on the blocking pool, keeping the runtime's workers free
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await?
    }

    /// `verify` on the blocking pool
    pub async fn verify_blocking(&self, plaintext: String, hash: String) -> Result<bool> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash)).await?
    }
}
