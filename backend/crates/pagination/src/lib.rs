//! Page/limit pagination primitives shared by list endpoints.
//!
//! Handlers accept optional `page` and `limit` query values, resolve them
//! against configured [`PageLimits`], and wrap the resulting slice in a
//! [`Paginated`] envelope. Pages are 1-based; limits above the configured
//! maximum are clamped rather than rejected.

use serde::{Deserialize, Serialize};

/// Errors raised while resolving pagination input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The requested page was zero.
    #[error("page must be greater than or equal to 1")]
    InvalidPage,
    /// The requested limit was zero.
    #[error("limit must be greater than or equal to 1")]
    InvalidLimit,
    /// The configured limits are inconsistent.
    #[error("default limit {default_limit} must be between 1 and max limit {max_limit}")]
    InvalidLimits {
        /// Configured default limit.
        default_limit: u32,
        /// Configured maximum limit.
        max_limit: u32,
    },
}

/// Configured default and maximum page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    default_limit: u32,
    max_limit: u32,
}

impl PageLimits {
    /// Build limits, rejecting a zero maximum or a default above the maximum.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidLimits`] when `default_limit` is zero
    /// or exceeds `max_limit`.
    pub const fn new(default_limit: u32, max_limit: u32) -> Result<Self, PaginationError> {
        if default_limit == 0 || default_limit > max_limit {
            return Err(PaginationError::InvalidLimits {
                default_limit,
                max_limit,
            });
        }
        Ok(Self {
            default_limit,
            max_limit,
        })
    }

    /// Default page size used when the caller omits `limit`.
    #[must_use]
    pub const fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// Upper bound applied to caller-supplied limits.
    #[must_use]
    pub const fn max_limit(&self) -> u32 {
        self.max_limit
    }

    /// Resolve optional caller input into concrete page parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] for `page = 0` and
    /// [`PaginationError::InvalidLimit`] for `limit = 0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::PageLimits;
    ///
    /// let limits = PageLimits::new(10, 100).expect("valid limits");
    /// let params = limits.resolve(Some(2), Some(500)).expect("valid input");
    /// assert_eq!(params.page(), 2);
    /// assert_eq!(params.limit(), 100);
    /// assert_eq!(params.offset(), 100);
    /// ```
    pub fn resolve(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<PageParams, PaginationError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(PaginationError::InvalidPage);
        }
        let limit = match limit {
            Some(0) => return Err(PaginationError::InvalidLimit),
            Some(requested) => requested.min(self.max_limit),
            None => self.default_limit,
        };
        Ok(PageParams { page, limit })
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// Validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    page: u32,
    limit: u32,
}

impl PageParams {
    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items skipped before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// Pagination metadata returned next to list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based page number.
    pub page: u32,
    /// Page size used for the query.
    pub limit: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Number of pages needed to cover `total`.
    pub total_pages: u64,
}

impl PageInfo {
    /// Build metadata for a page of a result set of `total` items.
    #[must_use]
    pub const fn new(params: PageParams, total: u64) -> Self {
        Self {
            page: params.page,
            limit: params.limit,
            total,
            total_pages: total.div_ceil(params.limit as u64),
        }
    }
}

/// One page of items plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    /// Items on the current page.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    /// Wrap a page of items.
    #[must_use]
    pub const fn new(items: Vec<T>, params: PageParams, total: u64) -> Self {
        Self {
            items,
            pagination: PageInfo::new(params, total),
        }
    }

    /// Transform every item while keeping the pagination metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
