//! Driving port for account management.

use std::fmt;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Caller, Email, Error, NewPassword, User, UserId, UserName};

/// Payload for creating an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: UserName,
    /// Login email.
    pub email: Email,
    /// Initial password.
    pub password: NewPassword,
    /// Requested role id; resolved against the role catalog.
    pub role_id: i32,
}

/// Partial profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// New display name.
    pub name: Option<UserName>,
    /// New email.
    pub email: Option<Email>,
    /// New role id. Admin only.
    pub role_id: Option<i32>,
}

/// Password change request.
#[derive(Clone)]
pub struct PasswordChange {
    /// Password the caller currently uses.
    pub current: Zeroizing<String>,
    /// Replacement password.
    pub new: NewPassword,
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}

/// Account mutations with owner-or-admin rules.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create an account. Admin only.
    async fn create(&self, caller: &Caller, new_user: NewUser) -> Result<User, Error>;

    /// Update profile fields of the caller or, for admins, anyone.
    async fn update(&self, caller: &Caller, id: &UserId, patch: UserPatch)
    -> Result<User, Error>;

    /// Change the caller's own password.
    async fn change_password(
        &self,
        caller: &Caller,
        id: &UserId,
        change: PasswordChange,
    ) -> Result<(), Error>;

    /// Delete an account. Admin only and never the caller's own.
    async fn delete(&self, caller: &Caller, id: &UserId) -> Result<(), Error>;
}
