//! Bcrypt-backed password hashing.
//!
//! Hashing is CPU bound, so both operations run on Tokio's blocking pool.

use async_trait::async_trait;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Lowest cost bcrypt accepts.
pub const BCRYPT_COST_MIN: u32 = 4;
/// Highest cost bcrypt accepts.
pub const BCRYPT_COST_MAX: u32 = 31;

/// [`PasswordHasher`] using bcrypt at a fixed cost.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher, clamping `cost` into bcrypt's accepted range.
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(BCRYPT_COST_MIN, BCRYPT_COST_MAX),
        }
    }

    /// Work factor applied to new hashes.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

fn join_error(error: task::JoinError) -> PasswordHashError {
    PasswordHashError::hash(format!("hashing task failed: {error}"))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let cost = self.cost;
        task::spawn_blocking(move || {
            bcrypt::hash(password.as_bytes(), cost)
                .map_err(|err| PasswordHashError::hash(err.to_string()))
        })
        .await
        .map_err(join_error)?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        task::spawn_blocking(move || {
            bcrypt::verify(password.as_bytes(), &hash)
                .map_err(|err| PasswordHashError::hash(err.to_string()))
        })
        .await
        .map_err(join_error)?
    }
}
