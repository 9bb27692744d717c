//! Builders wiring repositories into domain services and HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use pagination::PageLimits;
use tracing::info;

use crate::domain::ports::{CatalogRepository, SaleRepository, UserRepository};
use crate::domain::{
    CatalogService, Email, Error, NewPassword, PasswordLoginService, SaleService, StatsService,
    UserName, UserService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::MemoryStore;
use crate::outbound::persistence::{
    DieselCatalogRepository, DieselSaleRepository, DieselUserRepository,
};
use crate::outbound::security::BcryptPasswordHasher;
use crate::settings::BootstrapAdmin;

use super::ServerConfig;

/// Repository triple backing the services.
struct Repositories<S, U, C> {
    sales: Arc<S>,
    users: Arc<U>,
    catalog: Arc<C>,
}

fn admin_from_settings(admin: &BootstrapAdmin) -> Result<(Email, UserName, NewPassword), Error> {
    let email = Email::new(&admin.email)
        .map_err(|err| Error::validation(format!("bootstrap admin email: {err}")))?;
    let name = UserName::new(&admin.name)
        .map_err(|err| Error::validation(format!("bootstrap admin name: {err}")))?;
    let password = NewPassword::new(&admin.password)
        .map_err(|err| Error::validation(format!("bootstrap admin password: {err}")))?;
    Ok((email, name, password))
}

async fn wire<S, U, C>(
    repos: Repositories<S, U, C>,
    hasher: Arc<BcryptPasswordHasher>,
    page_limits: PageLimits,
    admin: Option<&BootstrapAdmin>,
) -> Result<HttpState, Error>
where
    S: SaleRepository + 'static,
    U: UserRepository + 'static,
    C: CatalogRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let Repositories {
        sales,
        users,
        catalog,
    } = repos;

    let user_service = Arc::new(UserService::new(
        users.clone(),
        hasher.clone(),
        clock.clone(),
    ));
    if let Some(admin) = admin {
        let (email, name, password) = admin_from_settings(admin)?;
        if !user_service.ensure_admin(email, name, password).await? {
            info!("bootstrap admin already present");
        }
    }

    let sale_service = Arc::new(SaleService::new(sales.clone(), catalog.clone(), clock));
    let stats_service = Arc::new(StatsService::new(sales, catalog.clone()));
    let ports = HttpStatePorts {
        login: Arc::new(PasswordLoginService::new(users, hasher)),
        sales: sale_service.clone(),
        sales_query: sale_service,
        stats: stats_service,
        users: user_service.clone(),
        users_query: user_service,
        catalog: Arc::new(CatalogService::new(catalog)),
    };
    Ok(HttpState::new(ports, page_limits))
}

/// Build HTTP state over PostgreSQL when a pool is configured, otherwise
/// over a fresh [`MemoryStore`]. Ensures the bootstrap administrator exists.
///
/// # Errors
/// Returns an error when the bootstrap administrator is invalid or cannot
/// be stored.
pub async fn build_http_state(
    config: &ServerConfig,
    admin: Option<&BootstrapAdmin>,
) -> Result<HttpState, Error> {
    let hasher = Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost));
    match &config.db_pool {
        Some(pool) => {
            let repos = Repositories {
                sales: Arc::new(DieselSaleRepository::new(pool.clone())),
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                catalog: Arc::new(DieselCatalogRepository::new(pool.clone())),
            };
            wire(repos, hasher, config.page_limits, admin).await
        }
        None => {
            let store = Arc::new(MemoryStore::default());
            let repos = Repositories {
                sales: store.clone(),
                users: store.clone(),
                catalog: store,
            };
            wire(repos, hasher, config.page_limits, admin).await
        }
    }
}
