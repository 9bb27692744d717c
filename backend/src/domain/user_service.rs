//! Account management service implementing the user driving ports.
//!
//! Admins manage every account. Everyone else may read and edit only their
//! own profile and may never change a role.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{PageParams, Paginated};
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    NewUser, PasswordChange, PasswordHasher, UserPatch, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{Caller, Email, Error, NewPassword, Role, User, UserId, UserName};

/// User service implementing [`UsersCommand`] and [`UsersQuery`].
#[derive(Clone)]
pub struct UserService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, H> UserService<U, H> {
    /// Create a service over the given repository and hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

fn require_admin(caller: &Caller, action: &str) -> Result<(), Error> {
    if caller.is_admin() {
        return Ok(());
    }
    debug!(user_id = %caller.user_id(), action, "admin-only action denied");
    Err(Error::forbidden(format!("only admins may {action}")))
}

fn require_self_or_admin(caller: &Caller, id: &UserId) -> Result<(), Error> {
    if caller.can_access(id) {
        return Ok(());
    }
    debug!(user_id = %caller.user_id(), target = %id, "foreign account access denied");
    Err(Error::forbidden("you may only access your own account"))
}

fn resolve_role(role_id: i32) -> Result<Role, Error> {
    Role::from_id(role_id).ok_or_else(|| {
        Error::reference_not_found(format!("role {role_id} does not exist"))
            .with_details(json!({ "field": "roleId" }))
    })
}

impl<U, H> UserService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    /// Create an admin account unless one with `email` already exists.
    ///
    /// Returns `true` when an account was created.
    ///
    /// # Errors
    /// Propagates repository and hashing failures.
    pub async fn ensure_admin(
        &self,
        email: Email,
        name: UserName,
        password: NewPassword,
    ) -> Result<bool, Error> {
        if self.users.find_credentials_by_email(&email).await?.is_some() {
            return Ok(false);
        }
        let user = self
            .insert_user(email, name, &password, Role::Admin)
            .await?;
        info!(user_id = %user.id, "bootstrap admin created");
        Ok(true)
    }

    async fn insert_user(
        &self,
        email: Email,
        name: UserName,
        password: &NewPassword,
        role: Role,
    ) -> Result<User, Error> {
        let password_hash = self.hasher.hash(password.expose()).await?;
        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            name,
            email,
            role,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(&user, &password_hash).await?;
        Ok(user)
    }
}

#[async_trait]
impl<U, H> UsersCommand for UserService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn create(&self, caller: &Caller, new_user: NewUser) -> Result<User, Error> {
        require_admin(caller, "create users")?;
        let role = resolve_role(new_user.role_id)?;
        let user = self
            .insert_user(new_user.email, new_user.name, &new_user.password, role)
            .await?;
        info!(user_id = %user.id, created_by = %caller.user_id(), "user created");
        Ok(user)
    }

    async fn update(
        &self,
        caller: &Caller,
        id: &UserId,
        patch: UserPatch,
    ) -> Result<User, Error> {
        require_self_or_admin(caller, id)?;
        let role = match patch.role_id {
            Some(role_id) => {
                require_admin(caller, "change roles")?;
                Some(resolve_role(role_id)?)
            }
            None => None,
        };
        let existing = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;
        let updated = User {
            name: patch.name.unwrap_or(existing.name),
            email: patch.email.unwrap_or(existing.email),
            role: role.unwrap_or(existing.role),
            updated_at: self.clock.utc(),
            ..existing
        };
        if !self.users.update(&updated).await? {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, updated_by = %caller.user_id(), "user updated");
        Ok(updated)
    }

    async fn change_password(
        &self,
        caller: &Caller,
        id: &UserId,
        change: PasswordChange,
    ) -> Result<(), Error> {
        if caller.user_id() != id {
            return Err(Error::forbidden("you may only change your own password"));
        }
        let stored = self
            .users
            .find_credentials_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;
        let matches = self
            .hasher
            .verify(change.current.as_str(), &stored.password_hash)
            .await?;
        if !matches {
            return Err(Error::validation("current password is incorrect")
                .with_details(json!({ "field": "currentPassword" })));
        }
        let password_hash = self.hasher.hash(change.new.expose()).await?;
        if !self
            .users
            .set_password_hash(id, &password_hash, self.clock.utc())
            .await?
        {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, "password changed");
        Ok(())
    }

    async fn delete(&self, caller: &Caller, id: &UserId) -> Result<(), Error> {
        require_admin(caller, "delete users")?;
        if caller.user_id() == id {
            return Err(Error::validation("admins cannot delete their own account"));
        }
        if !self.users.delete(id).await? {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, deleted_by = %caller.user_id(), "user deleted");
        Ok(())
    }
}

#[async_trait]
impl<U, H> UsersQuery for UserService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn get(&self, caller: &Caller, id: &UserId) -> Result<User, Error> {
        require_self_or_admin(caller, id)?;
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    async fn list(&self, caller: &Caller, page: PageParams) -> Result<Paginated<User>, Error> {
        require_admin(caller, "list users")?;
        Ok(self.users.list(page).await?)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
