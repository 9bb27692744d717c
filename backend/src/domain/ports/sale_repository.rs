//! Port abstraction for sale persistence adapters and their errors.

use async_trait::async_trait;
use pagination::{PageParams, Paginated};

use crate::domain::sales::scope::ScopedSaleFilter;
use crate::domain::{Error, Sale, SaleId, SaleView};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by sale repository adapters.
    pub enum SalePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "sale repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "sale repository query failed: {message}",
        /// A foreign key (product, franchise or user) did not resolve.
        MissingReference { message: String } => "sale references a missing row: {message}",
    }
}

/// Storage for sale records and their read model.
///
/// Listing and aggregate loading take a [`ScopedSaleFilter`] so both apply
/// the same predicate. Results are ordered by `createdAt` then `id`, newest
/// first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Insert a new sale.
    async fn insert(&self, sale: &Sale) -> Result<(), SalePersistenceError>;

    /// Overwrite an existing sale. Returns `false` when no row matched.
    async fn update(&self, sale: &Sale) -> Result<bool, SalePersistenceError>;

    /// Delete a sale. Returns `false` when no row matched.
    async fn delete(&self, id: &SaleId) -> Result<bool, SalePersistenceError>;

    /// Fetch the stored record.
    async fn find_by_id(&self, id: &SaleId) -> Result<Option<Sale>, SalePersistenceError>;

    /// Fetch the read model of one sale.
    async fn find_view(&self, id: &SaleId) -> Result<Option<SaleView>, SalePersistenceError>;

    /// One page of the scoped sale set.
    async fn list(
        &self,
        filter: &ScopedSaleFilter,
        page: PageParams,
    ) -> Result<Paginated<SaleView>, SalePersistenceError>;

    /// Every sale in the scoped set, for aggregation.
    async fn load_scoped(
        &self,
        filter: &ScopedSaleFilter,
    ) -> Result<Vec<SaleView>, SalePersistenceError>;
}

impl From<SalePersistenceError> for Error {
    fn from(value: SalePersistenceError) -> Self {
        match value {
            SalePersistenceError::MissingReference { message } => {
                Error::reference_not_found(format!("sale references a missing row: {message}"))
            }
            other => Error::store_failure(other.to_string()),
        }
    }
}
