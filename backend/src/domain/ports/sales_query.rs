//! Driving port for sale reads.

use async_trait::async_trait;
use pagination::{PageParams, Paginated};

use crate::domain::sales::scope::SaleFilter;
use crate::domain::sales::stats::{SaleTotals, StatusCount};
use crate::domain::{Caller, Error, SaleId, SaleView};

/// Role-scoped sale reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SalesQuery: Send + Sync {
    /// Fetch one sale the caller may access.
    async fn get(&self, caller: &Caller, id: &SaleId) -> Result<SaleView, Error>;

    /// One page of the caller's scoped sale set.
    async fn list(
        &self,
        caller: &Caller,
        filter: SaleFilter,
        page: PageParams,
    ) -> Result<Paginated<SaleView>, Error>;

    /// Count and summed amount of the scoped set.
    async fn total(&self, caller: &Caller, filter: SaleFilter) -> Result<SaleTotals, Error>;

    /// Per-status counts of the scoped set.
    async fn count_by_status(
        &self,
        caller: &Caller,
        filter: SaleFilter,
    ) -> Result<Vec<StatusCount>, Error>;
}
