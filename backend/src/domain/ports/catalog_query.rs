//! Driving port for reference data listings.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Franchise, Product, RoleRecord};

/// Reference data visible to authenticated callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// Every product with its field rule.
    async fn products(&self) -> Result<Vec<Product>, Error>;

    /// Every card franchise.
    async fn franchises(&self) -> Result<Vec<Franchise>, Error>;

    /// Every role. Admin only.
    async fn roles(&self, caller: &Caller) -> Result<Vec<RoleRecord>, Error>;
}
