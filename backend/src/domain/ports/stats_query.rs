//! Driving port for dashboard statistics.

use async_trait::async_trait;

use crate::domain::sales::scope::SaleFilter;
use crate::domain::sales::stats::{
    AdvisorTotals, Granularity, ProductTotals, SalesSummary, TimelineBucket,
};
use crate::domain::{Caller, Error, SaleView};

/// Aggregates over the caller's scoped sale set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsQuery: Send + Sync {
    /// Count, total, average and status breakdown.
    async fn summary(&self, caller: &Caller, filter: SaleFilter) -> Result<SalesSummary, Error>;

    /// Totals for every catalog product.
    async fn by_product(
        &self,
        caller: &Caller,
        filter: SaleFilter,
    ) -> Result<Vec<ProductTotals>, Error>;

    /// Totals per advisor; empty for non-admin callers.
    async fn by_advisor(
        &self,
        caller: &Caller,
        filter: SaleFilter,
    ) -> Result<Vec<AdvisorTotals>, Error>;

    /// Totals grouped by creation period.
    async fn timeline(
        &self,
        caller: &Caller,
        filter: SaleFilter,
        granularity: Granularity,
    ) -> Result<Vec<TimelineBucket>, Error>;

    /// Best-selling products by count.
    async fn top_products(
        &self,
        caller: &Caller,
        filter: SaleFilter,
        n: Option<u32>,
    ) -> Result<Vec<ProductTotals>, Error>;

    /// Most recently created sales.
    async fn recent(
        &self,
        caller: &Caller,
        filter: SaleFilter,
        n: Option<u32>,
    ) -> Result<Vec<SaleView>, Error>;
}
