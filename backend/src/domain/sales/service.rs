//! Sale lifecycle service implementing the sale driving ports.
//!
//! Writes validate the complete resulting record before reaching the
//! repository, so a rejected request never mutates stored data. Ownership is
//! checked against the stored creator; advisors may only touch their own
//! sales.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{PageParams, Paginated};
use tracing::{debug, info};

use super::scope::{SaleFilter, ScopedSaleFilter};
use super::stats::{self, SaleTotals, StatusCount};
use super::validation::validate_sale_fields;
use super::{Sale, SaleDraft, SaleId, SalePatch, SaleView};
use crate::domain::ports::{CatalogRepository, SaleRepository, SalesCommand, SalesQuery};
use crate::domain::{Caller, Error};

/// Sale service implementing [`SalesCommand`] and [`SalesQuery`].
#[derive(Clone)]
pub struct SaleService<S, C> {
    sales: Arc<S>,
    catalog: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<S, C> SaleService<S, C> {
    /// Create a service over the given repositories.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use salesdesk::domain::SaleService;
    /// use salesdesk::domain::ports::FixtureCatalogRepository;
    /// use salesdesk::outbound::memory::MemoryStore;
    ///
    /// let store = Arc::new(MemoryStore::default());
    /// let service = SaleService::new(store, Arc::new(FixtureCatalogRepository), Arc::new(DefaultClock));
    /// # let _ = service;
    /// ```
    pub fn new(sales: Arc<S>, catalog: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sales,
            catalog,
            clock,
        }
    }
}

fn sale_not_found(id: &SaleId) -> Error {
    Error::not_found(format!("sale {id} not found"))
}

fn deny(caller: &Caller, id: &SaleId) -> Error {
    debug!(user_id = %caller.user_id(), sale_id = %id, "sale access denied");
    Error::forbidden("you may only access sales you created")
}

impl<S, C> SaleService<S, C>
where
    S: SaleRepository,
    C: CatalogRepository,
{
    async fn load_accessible(&self, caller: &Caller, id: &SaleId) -> Result<Sale, Error> {
        let sale = self
            .sales
            .find_by_id(id)
            .await?
            .ok_or_else(|| sale_not_found(id))?;
        if !caller.can_access(&sale.creator_user_id) {
            return Err(deny(caller, id));
        }
        Ok(sale)
    }

    async fn read_back(&self, id: &SaleId) -> Result<SaleView, Error> {
        self.sales
            .find_view(id)
            .await?
            .ok_or_else(|| Error::store_failure(format!("sale {id} missing after write")))
    }

    async fn scoped_sales(
        &self,
        caller: &Caller,
        filter: SaleFilter,
    ) -> Result<Vec<SaleView>, Error> {
        let scoped = ScopedSaleFilter::for_caller(caller, filter)?;
        Ok(self.sales.load_scoped(&scoped).await?)
    }
}

#[async_trait]
impl<S, C> SalesCommand for SaleService<S, C>
where
    S: SaleRepository,
    C: CatalogRepository,
{
    async fn create(&self, caller: &Caller, draft: SaleDraft) -> Result<SaleView, Error> {
        let catalog = self.catalog.load().await?;
        validate_sale_fields(&catalog, &draft.fields)?;

        let now = self.clock.utc();
        let sale = Sale {
            id: SaleId::random(),
            fields: draft.fields,
            status: draft.status.unwrap_or_default(),
            creator_user_id: *caller.user_id(),
            updater_user_id: *caller.user_id(),
            created_at: now,
            updated_at: now,
        };
        self.sales.insert(&sale).await?;
        info!(sale_id = %sale.id, user_id = %caller.user_id(), "sale created");
        self.read_back(&sale.id).await
    }

    async fn update(
        &self,
        caller: &Caller,
        id: &SaleId,
        patch: SalePatch,
    ) -> Result<SaleView, Error> {
        let existing = self.load_accessible(caller, id).await?;
        let fields = patch.merge(existing.fields);
        let catalog = self.catalog.load().await?;
        validate_sale_fields(&catalog, &fields)?;

        let updated = Sale {
            fields,
            status: patch.status.unwrap_or(existing.status),
            updater_user_id: *caller.user_id(),
            updated_at: self.clock.utc(),
            ..existing
        };
        if !self.sales.update(&updated).await? {
            return Err(sale_not_found(id));
        }
        info!(sale_id = %id, user_id = %caller.user_id(), "sale updated");
        self.read_back(id).await
    }

    async fn delete(&self, caller: &Caller, id: &SaleId) -> Result<(), Error> {
        self.load_accessible(caller, id).await?;
        if !self.sales.delete(id).await? {
            return Err(sale_not_found(id));
        }
        info!(sale_id = %id, user_id = %caller.user_id(), "sale deleted");
        Ok(())
    }
}

#[async_trait]
impl<S, C> SalesQuery for SaleService<S, C>
where
    S: SaleRepository,
    C: CatalogRepository,
{
    async fn get(&self, caller: &Caller, id: &SaleId) -> Result<SaleView, Error> {
        let view = self
            .sales
            .find_view(id)
            .await?
            .ok_or_else(|| sale_not_found(id))?;
        if !caller.can_access(&view.creator_user_id) {
            return Err(deny(caller, id));
        }
        Ok(view)
    }

    async fn list(
        &self,
        caller: &Caller,
        filter: SaleFilter,
        page: PageParams,
    ) -> Result<Paginated<SaleView>, Error> {
        let scoped = ScopedSaleFilter::for_caller(caller, filter)?;
        Ok(self.sales.list(&scoped, page).await?)
    }

    async fn total(&self, caller: &Caller, filter: SaleFilter) -> Result<SaleTotals, Error> {
        let sales = self.scoped_sales(caller, filter).await?;
        Ok(stats::totals(&sales))
    }

    async fn count_by_status(
        &self,
        caller: &Caller,
        filter: SaleFilter,
    ) -> Result<Vec<StatusCount>, Error> {
        let sales = self.scoped_sales(caller, filter).await?;
        Ok(stats::count_by_status(&sales))
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
