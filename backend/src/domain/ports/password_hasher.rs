//! Port for one-way password hashing.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::Error;

define_port_error! {
    /// Errors raised by hashing adapters.
    pub enum PasswordHashError {
        /// Hashing or verification could not run.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Hashes and verifies passwords.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain-text password.
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check a plain-text password against a stored hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}

impl From<PasswordHashError> for Error {
    fn from(value: PasswordHashError) -> Self {
        Error::store_failure(value.to_string())
    }
}
