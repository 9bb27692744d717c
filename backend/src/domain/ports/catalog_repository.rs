//! Port for the read-only reference tables.

use async_trait::async_trait;

use crate::domain::{Catalog, Error};

use super::define_port_error;

define_port_error! {
    /// Errors raised while loading reference data.
    pub enum CatalogPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalog repository connection failed: {message}",
        /// Query failed or returned malformed rows.
        Query { message: String } => "catalog repository query failed: {message}",
    }
}

/// Source of products, franchises and roles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Load every reference table.
    async fn load(&self) -> Result<Catalog, CatalogPersistenceError>;
}

/// Catalog served from the seeded constants, for tests and the in-process store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogRepository;

#[async_trait]
impl CatalogRepository for FixtureCatalogRepository {
    async fn load(&self) -> Result<Catalog, CatalogPersistenceError> {
        Ok(Catalog::seeded())
    }
}

impl From<CatalogPersistenceError> for Error {
    fn from(value: CatalogPersistenceError) -> Self {
        Error::store_failure(value.to_string())
    }
}
