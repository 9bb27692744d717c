//! Driving port for login and per-request identity resolution.
//!
//! Inbound adapters authenticate credentials and turn a session's user id
//! into a [`Caller`] without knowing the backing infrastructure.

use async_trait::async_trait;

use crate::domain::{Caller, Error, LoginCredentials, User, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated account.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Resolve the caller behind a session. Fails with an authentication
    /// error when the account no longer exists.
    async fn resolve_caller(&self, user_id: &UserId) -> Result<Caller, Error>;
}
