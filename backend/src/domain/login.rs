//! Password login and session identity resolution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{LoginService, PasswordHasher, UserRepository};
use crate::domain::{Caller, Error, LoginCredentials, User, UserId};

/// [`LoginService`] backed by stored bcrypt hashes.
#[derive(Clone)]
pub struct PasswordLoginService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> PasswordLoginService<U, H> {
    /// Create the service.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

#[async_trait]
impl<U, H> LoginService for PasswordLoginService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(stored) = self
            .users
            .find_credentials_by_email(credentials.email())
            .await?
        else {
            debug!("login attempt for unknown email");
            return Err(invalid_credentials());
        };
        let verified = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await?;
        if !verified {
            warn!(user_id = %stored.user.id, "login rejected: wrong password");
            return Err(invalid_credentials());
        }
        Ok(stored.user)
    }

    async fn resolve_caller(&self, user_id: &UserId) -> Result<Caller, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))?;
        Ok(Caller::new(user.id, user.role))
    }
}
