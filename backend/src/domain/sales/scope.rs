//! Role-scoped sale predicate shared by listing, totals and statistics.
//!
//! Advisors are always pinned to their own sales; admins see everything
//! unless they narrow by creator. Every other filter is ANDed on top.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::json;

use super::{SaleStatus, SaleView};
use crate::domain::catalog::ProductId;
use crate::domain::{Caller, Error, UserId};

/// Explicit filters supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleFilter {
    /// Only sales of this product.
    pub product_id: Option<ProductId>,
    /// Only sales in this status.
    pub status: Option<SaleStatus>,
    /// Only sales created by this user. Ignored for advisors.
    pub creator_user_id: Option<UserId>,
    /// Inclusive lower bound on `createdAt`.
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `createdAt`.
    pub created_to: Option<DateTime<Utc>>,
}

/// Filter with the caller's ownership constraint applied.
///
/// The only way to build one is [`ScopedSaleFilter::for_caller`], so a
/// repository cannot be handed an unscoped predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedSaleFilter {
    creator_user_id: Option<UserId>,
    product_id: Option<ProductId>,
    status: Option<SaleStatus>,
    created_from: Option<DateTime<Utc>>,
    created_to: Option<DateTime<Utc>>,
}

impl ScopedSaleFilter {
    /// Combine the caller's role constraint with explicit filters.
    ///
    /// # Errors
    /// Returns a validation failure when `created_to` precedes `created_from`.
    ///
    /// # Examples
    /// ```
    /// use salesdesk::domain::{Caller, Role, UserId};
    /// use salesdesk::domain::sales::scope::{SaleFilter, ScopedSaleFilter};
    ///
    /// let advisor = Caller::new(UserId::random(), Role::Advisor);
    /// let other = UserId::random();
    /// let filter = SaleFilter { creator_user_id: Some(other), ..SaleFilter::default() };
    /// let scoped = ScopedSaleFilter::for_caller(&advisor, filter).unwrap();
    /// assert_eq!(scoped.creator_user_id(), Some(advisor.user_id()));
    /// ```
    pub fn for_caller(caller: &Caller, filter: SaleFilter) -> Result<Self, Error> {
        if let (Some(from), Some(to)) = (filter.created_from, filter.created_to) {
            if to < from {
                return Err(Error::validation("endDate must not precede startDate")
                    .with_details(json!({ "field": "endDate", "rule": "range" })));
            }
        }
        let creator_user_id = if caller.is_admin() {
            filter.creator_user_id
        } else {
            Some(*caller.user_id())
        };
        Ok(Self {
            creator_user_id,
            product_id: filter.product_id,
            status: filter.status,
            created_from: filter.created_from,
            created_to: filter.created_to,
        })
    }

    /// Creator constraint, if any.
    #[must_use]
    pub fn creator_user_id(&self) -> Option<&UserId> {
        self.creator_user_id.as_ref()
    }

    /// Product constraint, if any.
    #[must_use]
    pub fn product_id(&self) -> Option<ProductId> {
        self.product_id
    }

    /// Status constraint, if any.
    #[must_use]
    pub fn status(&self) -> Option<SaleStatus> {
        self.status
    }

    /// Inclusive lower creation bound.
    #[must_use]
    pub fn created_from(&self) -> Option<DateTime<Utc>> {
        self.created_from
    }

    /// Inclusive upper creation bound.
    #[must_use]
    pub fn created_to(&self) -> Option<DateTime<Utc>> {
        self.created_to
    }

    /// Evaluate the predicate against a sale.
    #[must_use]
    pub fn matches(&self, sale: &SaleView) -> bool {
        self.creator_user_id
            .is_none_or(|creator| sale.creator_user_id == creator)
            && self.product_id.is_none_or(|id| sale.product_id == id)
            && self.status.is_none_or(|status| sale.status == status)
            && self.created_from.is_none_or(|from| sale.created_at >= from)
            && self.created_to.is_none_or(|to| sale.created_at <= to)
    }
}

/// Error returned when a date filter cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is neither a YYYY-MM-DD date nor an RFC 3339 timestamp")]
pub struct InvalidDateBound(pub String);

/// Which end of a range a date bound describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    /// Bare dates resolve to the first instant of the day.
    Start,
    /// Bare dates resolve to the last microsecond of the day.
    End,
}

/// Parse a date filter.
///
/// Accepts `YYYY-MM-DD` (interpreted in UTC and widened to the whole day) or
/// an RFC 3339 timestamp, used as-is.
///
/// # Examples
/// ```
/// use salesdesk::domain::sales::scope::{BoundSide, parse_date_bound};
///
/// let end = parse_date_bound("2024-03-01", BoundSide::End).unwrap();
/// assert_eq!(end.to_rfc3339(), "2024-03-01T23:59:59.999999+00:00");
/// ```
pub fn parse_date_bound(raw: &str, side: BoundSide) -> Result<DateTime<Utc>, InvalidDateBound> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = match side {
            BoundSide::Start => NaiveTime::MIN,
            BoundSide::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
                .ok_or_else(|| InvalidDateBound(raw.to_owned()))?,
        };
        return Ok(Utc.from_utc_datetime(&date.and_time(time)));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|_| InvalidDateBound(raw.to_owned()))
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
