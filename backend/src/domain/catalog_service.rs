//! Reference data listings.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CatalogQuery, CatalogRepository};
use crate::domain::{Caller, Error, Franchise, Product, RoleRecord};

/// [`CatalogQuery`] over a [`CatalogRepository`].
#[derive(Clone)]
pub struct CatalogService<C> {
    catalog: Arc<C>,
}

impl<C> CatalogService<C> {
    /// Create the service.
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl<C> CatalogQuery for CatalogService<C>
where
    C: CatalogRepository,
{
    async fn products(&self) -> Result<Vec<Product>, Error> {
        Ok(self.catalog.load().await?.products)
    }

    async fn franchises(&self) -> Result<Vec<Franchise>, Error> {
        Ok(self.catalog.load().await?.franchises)
    }

    async fn roles(&self, caller: &Caller) -> Result<Vec<RoleRecord>, Error> {
        if !caller.is_admin() {
            return Err(Error::forbidden("only admins may list roles"));
        }
        Ok(self.catalog.load().await?.roles)
    }
}
