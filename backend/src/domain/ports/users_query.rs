//! Driving port for account reads.

use async_trait::async_trait;
use pagination::{PageParams, Paginated};

use crate::domain::{Caller, Error, User, UserId};

/// Account reads with owner-or-admin rules.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch the caller's own account or, for admins, any account.
    async fn get(&self, caller: &Caller, id: &UserId) -> Result<User, Error>;

    /// Page through every account. Admin only.
    async fn list(&self, caller: &Caller, page: PageParams) -> Result<Paginated<User>, Error>;
}
