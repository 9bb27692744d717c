//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`, [`LoginService`])
//! are implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod catalog_query;
mod catalog_repository;
mod login_service;
mod password_hasher;
mod sale_repository;
mod sales_command;
mod sales_query;
mod stats_query;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use catalog_query::MockCatalogQuery;
pub use catalog_query::CatalogQuery;
#[cfg(test)]
pub use catalog_repository::MockCatalogRepository;
pub use catalog_repository::{
    CatalogPersistenceError, CatalogRepository, FixtureCatalogRepository,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use sale_repository::MockSaleRepository;
pub use sale_repository::{SalePersistenceError, SaleRepository};
#[cfg(test)]
pub use sales_command::MockSalesCommand;
pub use sales_command::SalesCommand;
#[cfg(test)]
pub use sales_query::MockSalesQuery;
pub use sales_query::SalesQuery;
#[cfg(test)]
pub use stats_query::MockStatsQuery;
pub use stats_query::StatsQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::{NewUser, PasswordChange, UserPatch, UsersCommand};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
