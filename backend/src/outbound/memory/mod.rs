//! In-process store used when no database URL is configured.
//!
//! [`MemoryStore`] implements the sale, user and catalog repository ports
//! over a single mutex-guarded state so referential checks (unknown role,
//! missing product, user still owning sales) behave like the PostgreSQL
//! constraints. Contents are lost on restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{PageParams, Paginated};

use crate::domain::ports::{
    CatalogPersistenceError, CatalogRepository, SalePersistenceError, SaleRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::sales::scope::ScopedSaleFilter;
use crate::domain::{Catalog, Email, Sale, SaleId, SaleView, StoredCredentials, User, UserId};

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, StoredCredentials>,
    sales: HashMap<SaleId, Sale>,
}

/// Mutex-guarded store backing every repository port.
#[derive(Debug)]
pub struct MemoryStore {
    catalog: Catalog,
    state: Mutex<State>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Catalog::seeded())
    }
}

/// Raised when a previous holder of the state lock panicked.
const POISONED: &str = "in-memory store lock poisoned";

impl MemoryStore {
    /// Create an empty store serving `catalog` as reference data.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            state: Mutex::new(State::default()),
        }
    }

    fn lock(&self) -> Option<MutexGuard<'_, State>> {
        self.state.lock().ok()
    }

    fn lock_sales(&self) -> Result<MutexGuard<'_, State>, SalePersistenceError> {
        self.lock().ok_or_else(|| SalePersistenceError::connection(POISONED))
    }

    fn lock_users(&self) -> Result<MutexGuard<'_, State>, UserPersistenceError> {
        self.lock().ok_or_else(|| UserPersistenceError::connection(POISONED))
    }

    fn check_references(&self, state: &State, sale: &Sale) -> Result<(), SalePersistenceError> {
        if self.catalog.product(sale.fields.product_id).is_none() {
            return Err(SalePersistenceError::missing_reference(format!(
                "product {}",
                sale.fields.product_id.0
            )));
        }
        if let Some(franchise_id) = sale.fields.franchise_id {
            if self.catalog.franchise(franchise_id).is_none() {
                return Err(SalePersistenceError::missing_reference(format!(
                    "franchise {}",
                    franchise_id.0
                )));
            }
        }
        for user_id in [&sale.creator_user_id, &sale.updater_user_id] {
            if !state.users.contains_key(user_id) {
                return Err(SalePersistenceError::missing_reference(format!(
                    "user {user_id}"
                )));
            }
        }
        Ok(())
    }

    fn view(&self, state: &State, sale: &Sale) -> Result<SaleView, SalePersistenceError> {
        let product = self
            .catalog
            .product(sale.fields.product_id)
            .ok_or_else(|| SalePersistenceError::query("sale product vanished"))?;
        let franchise_name = sale
            .fields
            .franchise_id
            .and_then(|id| self.catalog.franchise(id))
            .map(|franchise| franchise.name.clone());
        let creator = state
            .users
            .get(&sale.creator_user_id)
            .ok_or_else(|| SalePersistenceError::query("sale creator vanished"))?;
        Ok(SaleView {
            id: sale.id,
            product_id: sale.fields.product_id,
            product_name: product.name.clone(),
            requested_amount: sale.fields.requested_amount,
            franchise_id: sale.fields.franchise_id,
            franchise_name,
            rate: sale.fields.rate,
            status: sale.status,
            creator_user_id: sale.creator_user_id,
            creator_name: creator.user.name.to_string(),
            updater_user_id: sale.updater_user_id,
            created_at: sale.created_at,
            updated_at: sale.updated_at,
        })
    }

    fn scoped_views(
        &self,
        state: &State,
        filter: &ScopedSaleFilter,
    ) -> Result<Vec<SaleView>, SalePersistenceError> {
        let mut views = state
            .sales
            .values()
            .map(|sale| self.view(state, sale))
            .collect::<Result<Vec<_>, _>>()?;
        views.retain(|view| filter.matches(view));
        views.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(views)
    }

    fn ensure_unique_email(state: &State, user: &User) -> Result<(), UserPersistenceError> {
        let taken = state
            .users
            .values()
            .any(|stored| stored.user.email == user.email && stored.user.id != user.id);
        if taken {
            return Err(UserPersistenceError::duplicate_email(user.email.to_string()));
        }
        Ok(())
    }

    fn ensure_known_role(&self, user: &User) -> Result<(), UserPersistenceError> {
        let role_id = user.role.id();
        if self.catalog.roles.iter().any(|role| role.id == role_id) {
            Ok(())
        } else {
            Err(UserPersistenceError::unknown_role(role_id))
        }
    }
}

fn page_of<T: Clone>(items: &[T], page: PageParams) -> Paginated<T> {
    let total = items.len() as u64;
    let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let slice = items
        .iter()
        .skip(start)
        .take(page.limit() as usize)
        .cloned()
        .collect();
    Paginated::new(slice, page, total)
}

#[async_trait]
impl SaleRepository for MemoryStore {
    async fn insert(&self, sale: &Sale) -> Result<(), SalePersistenceError> {
        let mut state = self.lock_sales()?;
        self.check_references(&state, sale)?;
        if state.sales.contains_key(&sale.id) {
            return Err(SalePersistenceError::query(format!(
                "sale {} already exists",
                sale.id
            )));
        }
        state.sales.insert(sale.id, sale.clone());
        Ok(())
    }

    async fn update(&self, sale: &Sale) -> Result<bool, SalePersistenceError> {
        let mut state = self.lock_sales()?;
        if !state.sales.contains_key(&sale.id) {
            return Ok(false);
        }
        self.check_references(&state, sale)?;
        state.sales.insert(sale.id, sale.clone());
        Ok(true)
    }

    async fn delete(&self, id: &SaleId) -> Result<bool, SalePersistenceError> {
        let mut state = self.lock_sales()?;
        Ok(state.sales.remove(id).is_some())
    }

    async fn find_by_id(&self, id: &SaleId) -> Result<Option<Sale>, SalePersistenceError> {
        let state = self.lock_sales()?;
        Ok(state.sales.get(id).cloned())
    }

    async fn find_view(&self, id: &SaleId) -> Result<Option<SaleView>, SalePersistenceError> {
        let state = self.lock_sales()?;
        state
            .sales
            .get(id)
            .map(|sale| self.view(&state, sale))
            .transpose()
    }

    async fn list(
        &self,
        filter: &ScopedSaleFilter,
        page: PageParams,
    ) -> Result<Paginated<SaleView>, SalePersistenceError> {
        let state = self.lock_sales()?;
        let views = self.scoped_views(&state, filter)?;
        Ok(page_of(&views, page))
    }

    async fn load_scoped(
        &self,
        filter: &ScopedSaleFilter,
    ) -> Result<Vec<SaleView>, SalePersistenceError> {
        let state = self.lock_sales()?;
        self.scoped_views(&state, filter)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut state = self.lock_users()?;
        self.ensure_known_role(user)?;
        Self::ensure_unique_email(&state, user)?;
        if state.users.contains_key(&user.id) {
            return Err(UserPersistenceError::query(format!(
                "user {} already exists",
                user.id
            )));
        }
        state.users.insert(
            user.id,
            StoredCredentials {
                user: user.clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock_users()?;
        if !state.users.contains_key(&user.id) {
            return Ok(false);
        }
        self.ensure_known_role(user)?;
        Self::ensure_unique_email(&state, user)?;
        if let Some(stored) = state.users.get_mut(&user.id) {
            stored.user = user.clone();
        }
        Ok(true)
    }

    async fn set_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock_users()?;
        Ok(match state.users.get_mut(id) {
            Some(stored) => {
                stored.password_hash = password_hash.to_owned();
                stored.user.updated_at = updated_at;
                true
            }
            None => false,
        })
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock_users()?;
        let referenced = state
            .sales
            .values()
            .any(|sale| sale.creator_user_id == *id || sale.updater_user_id == *id);
        if referenced {
            return Err(UserPersistenceError::in_use(format!(
                "user {id} is referenced by sales"
            )));
        }
        Ok(state.users.remove(id).is_some())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock_users()?;
        Ok(state.users.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.lock_users()?;
        Ok(state
            .users
            .values()
            .find(|stored| stored.user.email == *email)
            .cloned())
    }

    async fn find_credentials_by_id(
        &self,
        id: &UserId,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.lock_users()?;
        Ok(state.users.get(id).cloned())
    }

    async fn list(&self, page: PageParams) -> Result<Paginated<User>, UserPersistenceError> {
        let state = self.lock_users()?;
        let mut users: Vec<User> = state
            .users
            .values()
            .map(|stored| stored.user.clone())
            .collect();
        users.sort_by(|a, b| {
            a.name
                .as_ref()
                .cmp(b.name.as_ref())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(page_of(&users, page))
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn load(&self) -> Result<Catalog, CatalogPersistenceError> {
        Ok(self.catalog.clone())
    }
}

#[cfg(test)]
mod tests;
