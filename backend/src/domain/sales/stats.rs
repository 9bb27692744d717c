//! Dashboard aggregates over the role-scoped sale set.
//!
//! Every figure is computed from the rows selected by a
//! [`ScopedSaleFilter`](super::scope::ScopedSaleFilter), so a caller never sees
//! totals that include sales they could not list.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

use super::scope::{SaleFilter, ScopedSaleFilter};
use super::{SaleStatus, SaleView};
use crate::domain::catalog::{Catalog, ProductId};
use crate::domain::ports::{CatalogRepository, SaleRepository, StatsQuery};
use crate::domain::{Caller, Error, UserId};

/// Default number of entries returned by the top-products ranking.
pub const TOP_PRODUCTS_DEFAULT: u32 = 5;
/// Default number of entries returned by the recent-sales feed.
pub const RECENT_DEFAULT: u32 = 10;
/// Upper bound for both rankings.
pub const RANKING_MAX: u32 = 50;

/// Count and summed amount of a sale set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleTotals {
    /// Number of sales.
    pub count: u64,
    /// Sum of requested amounts.
    #[schema(value_type = String, example = "2500000.00")]
    pub total_amount: Decimal,
}

/// Number of sales in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    /// Status.
    pub status: SaleStatus,
    /// Number of sales.
    pub count: u64,
}

/// Headline dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    /// Number of sales.
    pub count: u64,
    /// Sum of requested amounts.
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    /// Mean requested amount rounded to cents; zero for an empty set.
    #[schema(value_type = String)]
    pub average_amount: Decimal,
    /// Counts for every status, including empty ones.
    pub by_status: Vec<StatusCount>,
}

/// Totals for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductTotals {
    /// Product identifier.
    #[schema(value_type = i32)]
    pub product_id: ProductId,
    /// Product display name.
    pub product_name: String,
    /// Number of sales.
    pub count: u64,
    /// Sum of requested amounts.
    #[schema(value_type = String)]
    pub total_amount: Decimal,
}

/// Totals for one advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorTotals {
    /// Creator identifier.
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    /// Creator display name.
    pub name: String,
    /// Number of sales.
    pub count: u64,
    /// Sum of requested amounts.
    #[schema(value_type = String)]
    pub total_amount: Decimal,
}

/// Bucket width for the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Calendar day.
    #[default]
    Day,
    /// ISO 8601 week.
    Week,
    /// Calendar month.
    Month,
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(Error::validation(format!(
                "granularity `{other}` is not one of day, week, month"
            ))
            .with_details(json!({ "field": "granularity", "rule": "enum" }))),
        }
    }
}

/// One timeline bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBucket {
    /// Bucket label: `2024-03-05`, `2024-W10` or `2024-03`.
    pub period: String,
    /// First day covered by the bucket.
    pub period_start: NaiveDate,
    /// Number of sales.
    pub count: u64,
    /// Sum of requested amounts.
    #[schema(value_type = String)]
    pub total_amount: Decimal,
}

/// Count and sum of `sales`.
#[must_use]
pub fn totals(sales: &[SaleView]) -> SaleTotals {
    SaleTotals {
        count: sales.len() as u64,
        total_amount: sales.iter().map(|sale| sale.requested_amount).sum(),
    }
}

/// Count per status; every status appears, in lifecycle order.
#[must_use]
pub fn count_by_status(sales: &[SaleView]) -> Vec<StatusCount> {
    SaleStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: sales.iter().filter(|sale| sale.status == status).count() as u64,
        })
        .collect()
}

/// Headline figures for `sales`.
///
/// # Examples
/// ```
/// use rust_decimal::Decimal;
/// use salesdesk::domain::sales::stats::summarize;
///
/// let empty = summarize(&[]);
/// assert_eq!(empty.count, 0);
/// assert_eq!(empty.average_amount, Decimal::ZERO);
/// ```
#[must_use]
pub fn summarize(sales: &[SaleView]) -> SalesSummary {
    let SaleTotals {
        count,
        total_amount,
    } = totals(sales);
    let average_amount = if count == 0 {
        Decimal::ZERO
    } else {
        (total_amount / Decimal::from(count)).round_dp(2)
    };
    SalesSummary {
        count,
        total_amount,
        average_amount,
        by_status: count_by_status(sales),
    }
}

/// Totals per catalog product, including products without sales.
#[must_use]
pub fn totals_by_product(catalog: &Catalog, sales: &[SaleView]) -> Vec<ProductTotals> {
    catalog
        .products
        .iter()
        .map(|product| {
            let matching = sales.iter().filter(|sale| sale.product_id == product.id);
            let (count, total_amount) = matching.fold((0_u64, Decimal::ZERO), |(n, sum), sale| {
                (n + 1, sum + sale.requested_amount)
            });
            ProductTotals {
                product_id: product.id,
                product_name: product.name.clone(),
                count,
                total_amount,
            }
        })
        .collect()
}

/// Totals per creator, largest amount first, then by name.
#[must_use]
pub fn totals_by_advisor(sales: &[SaleView]) -> Vec<AdvisorTotals> {
    let mut grouped: BTreeMap<UserId, AdvisorTotals> = BTreeMap::new();
    for sale in sales {
        let entry = grouped
            .entry(sale.creator_user_id)
            .or_insert_with(|| AdvisorTotals {
                user_id: sale.creator_user_id,
                name: sale.creator_name.clone(),
                count: 0,
                total_amount: Decimal::ZERO,
            });
        entry.count += 1;
        entry.total_amount += sale.requested_amount;
    }
    let mut rows: Vec<AdvisorTotals> = grouped.into_values().collect();
    rows.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    rows
}

fn bucket_of(date: NaiveDate, granularity: Granularity) -> (NaiveDate, String) {
    match granularity {
        Granularity::Day => (date, date.format("%Y-%m-%d").to_string()),
        Granularity::Week => {
            let week = date.iso_week();
            let start = NaiveDate::from_isoywd_opt(week.year(), week.week(), chrono::Weekday::Mon)
                .unwrap_or(date);
            (start, format!("{}-W{:02}", week.year(), week.week()))
        }
        Granularity::Month => {
            let start = date.with_day(1).unwrap_or(date);
            (start, date.format("%Y-%m").to_string())
        }
    }
}

/// Sales grouped by creation period, oldest bucket first. Empty periods are
/// omitted.
#[must_use]
pub fn timeline(sales: &[SaleView], granularity: Granularity) -> Vec<TimelineBucket> {
    let mut buckets: BTreeMap<NaiveDate, TimelineBucket> = BTreeMap::new();
    for sale in sales {
        let (period_start, period) = bucket_of(sale.created_at.date_naive(), granularity);
        let bucket = buckets
            .entry(period_start)
            .or_insert_with(|| TimelineBucket {
                period,
                period_start,
                count: 0,
                total_amount: Decimal::ZERO,
            });
        bucket.count += 1;
        bucket.total_amount += sale.requested_amount;
    }
    buckets.into_values().collect()
}

/// Products with at least one sale, ranked by count, then amount, then id.
#[must_use]
pub fn top_products(catalog: &Catalog, sales: &[SaleView], n: usize) -> Vec<ProductTotals> {
    let mut ranked: Vec<ProductTotals> = totals_by_product(catalog, sales)
        .into_iter()
        .filter(|row| row.count > 0)
        .collect();
    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.total_amount.cmp(&a.total_amount))
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(n);
    ranked
}

/// Resolve a ranking size: `None` means `default`, zero is rejected and
/// anything above [`RANKING_MAX`] is clamped.
///
/// # Errors
/// Returns a validation failure for zero.
pub fn resolve_ranking_size(requested: Option<u32>, default: u32) -> Result<usize, Error> {
    match requested {
        None => Ok(default as usize),
        Some(0) => Err(Error::validation("n must be at least 1")
            .with_details(json!({ "field": "n", "rule": "range" }))),
        Some(n) => Ok(n.min(RANKING_MAX) as usize),
    }
}

/// Aggregation service implementing [`StatsQuery`].
#[derive(Clone)]
pub struct StatsService<S, C> {
    sales: Arc<S>,
    catalog: Arc<C>,
}

impl<S, C> StatsService<S, C> {
    /// Create the service over the given repositories.
    pub fn new(sales: Arc<S>, catalog: Arc<C>) -> Self {
        Self { sales, catalog }
    }
}

impl<S, C> StatsService<S, C>
where
    S: SaleRepository,
    C: CatalogRepository,
{
    async fn scoped_sales(
        &self,
        caller: &Caller,
        filter: SaleFilter,
    ) -> Result<Vec<SaleView>, Error> {
        let scoped = ScopedSaleFilter::for_caller(caller, filter)?;
        Ok(self.sales.load_scoped(&scoped).await?)
    }

    async fn catalog(&self) -> Result<Catalog, Error> {
        Ok(self.catalog.load().await?)
    }
}

#[async_trait]
impl<S, C> StatsQuery for StatsService<S, C>
where
    S: SaleRepository,
    C: CatalogRepository,
{
    async fn summary(&self, caller: &Caller, filter: SaleFilter) -> Result<SalesSummary, Error> {
        let sales = self.scoped_sales(caller, filter).await?;
        Ok(summarize(&sales))
    }

    async fn by_product(
        &self,
        caller: &Caller,
        filter: SaleFilter,
    ) -> Result<Vec<ProductTotals>, Error> {
        let sales = self.scoped_sales(caller, filter).await?;
        let catalog = self.catalog().await?;
        Ok(totals_by_product(&catalog, &sales))
    }

    async fn by_advisor(
        &self,
        caller: &Caller,
        filter: SaleFilter,
    ) -> Result<Vec<AdvisorTotals>, Error> {
        if !caller.is_admin() {
            debug!(user_id = %caller.user_id(), "advisor breakdown withheld from non-admin");
            return Ok(Vec::new());
        }
        let sales = self.scoped_sales(caller, filter).await?;
        Ok(totals_by_advisor(&sales))
    }

    async fn timeline(
        &self,
        caller: &Caller,
        filter: SaleFilter,
        granularity: Granularity,
    ) -> Result<Vec<TimelineBucket>, Error> {
        let sales = self.scoped_sales(caller, filter).await?;
        Ok(timeline(&sales, granularity))
    }

    async fn top_products(
        &self,
        caller: &Caller,
        filter: SaleFilter,
        n: Option<u32>,
    ) -> Result<Vec<ProductTotals>, Error> {
        let n = resolve_ranking_size(n, TOP_PRODUCTS_DEFAULT)?;
        let sales = self.scoped_sales(caller, filter).await?;
        let catalog = self.catalog().await?;
        Ok(top_products(&catalog, &sales, n))
    }

    async fn recent(
        &self,
        caller: &Caller,
        filter: SaleFilter,
        n: Option<u32>,
    ) -> Result<Vec<SaleView>, Error> {
        let n = resolve_ranking_size(n, RECENT_DEFAULT)?;
        let mut sales = self.scoped_sales(caller, filter).await?;
        sales.truncate(n);
        Ok(sales)
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
