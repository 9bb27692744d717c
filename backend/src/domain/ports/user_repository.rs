//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{PageParams, Paginated};
use serde_json::json;

use crate::domain::{Email, Error, StoredCredentials, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email.
        DuplicateEmail { email: String } => "email {email} is already registered",
        /// The role id does not exist.
        UnknownRole { role_id: i32 } => "role {role_id} does not exist",
        /// The user is still referenced by sales.
        InUse { message: String } => "user is still referenced: {message}",
    }
}

/// Storage for user accounts and their password hashes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError>;

    /// Overwrite profile fields. Returns `false` when no row matched.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Replace the stored password hash. Returns `false` when no row matched.
    async fn set_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError>;

    /// Delete an account. Returns `false` when no row matched.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account and its hash by email.
    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Fetch an account and its hash by identifier.
    async fn find_credentials_by_id(
        &self,
        id: &UserId,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// One page of accounts ordered by name then id.
    async fn list(&self, page: PageParams) -> Result<Paginated<User>, UserPersistenceError>;
}

impl From<UserPersistenceError> for Error {
    fn from(value: UserPersistenceError) -> Self {
        match value {
            UserPersistenceError::DuplicateEmail { email } => {
                Error::duplicate_entry(format!("email {email} is already registered"))
                    .with_details(json!({ "field": "email" }))
            }
            UserPersistenceError::UnknownRole { role_id } => {
                Error::reference_not_found(format!("role {role_id} does not exist"))
                    .with_details(json!({ "field": "roleId" }))
            }
            UserPersistenceError::InUse { message } => {
                Error::validation(format!("user cannot be deleted: {message}"))
            }
            other => Error::store_failure(other.to_string()),
        }
    }
}
