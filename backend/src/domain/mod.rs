//! Domain primitives, services and ports.
//!
//! Purpose: define the sales-tracking model and its rules independently of
//! HTTP and storage. Inbound adapters call the driving ports in [`ports`];
//! outbound adapters implement the driven ones.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure taxonomy.
//! - [`Caller`] / [`Role`]: explicit identity threaded through services.
//! - [`sales`]: sale records, validation, scoping, lifecycle and statistics.
//! - [`UserService`], [`PasswordLoginService`], [`CatalogService`].

pub mod auth;
pub mod catalog;
pub mod catalog_service;
pub mod error;
pub mod login;
pub mod ports;
pub mod role;
pub mod sales;
pub mod trace_id;
pub mod user;
pub mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::auth::{
    CredentialsValidationError, LoginCredentials, NewPassword, PASSWORD_MAX, PASSWORD_MIN,
};
pub use self::catalog::{
    Catalog, ConditionalField, FieldRule, Franchise, FranchiseId, Product, ProductId, RoleRecord,
};
pub use self::catalog_service::CatalogService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::login::PasswordLoginService;
pub use self::role::{Caller, Role};
pub use self::sales::service::SaleService;
pub use self::sales::stats::StatsService;
pub use self::sales::{
    Sale, SaleDraft, SaleFields, SaleId, SalePatch, SaleStatus, SaleView, UnknownSaleStatus,
};
pub use self::trace_id::TraceId;
pub use self::user::{Email, StoredCredentials, User, UserId, UserName, UserValidationError};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use salesdesk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
