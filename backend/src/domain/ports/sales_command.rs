//! Driving port for sale writes.

use async_trait::async_trait;

use crate::domain::{Caller, Error, SaleDraft, SaleId, SalePatch, SaleView};

/// Sale lifecycle mutations.
///
/// Every write validates the resulting record before touching the store and
/// records the caller as the last updater.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SalesCommand: Send + Sync {
    /// Register a sale owned by the caller.
    async fn create(&self, caller: &Caller, draft: SaleDraft) -> Result<SaleView, Error>;

    /// Apply a partial update to a sale the caller may access.
    async fn update(
        &self,
        caller: &Caller,
        id: &SaleId,
        patch: SalePatch,
    ) -> Result<SaleView, Error>;

    /// Delete a sale the caller may access.
    async fn delete(&self, caller: &Caller, id: &SaleId) -> Result<(), Error>;
}
