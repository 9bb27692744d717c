//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel rows (`models.rs`,
//! `schema.rs`, both internal) and domain types; no business rules live here.
//! Connections come from a `bb8` pool through `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use salesdesk::outbound::persistence::{DbPool, DieselSaleRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/salesdesk")).await?;
//! let sales = DieselSaleRepository::new(pool);
//! ```

mod diesel_catalog_repository;
mod diesel_sale_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalog_repository::DieselCatalogRepository;
pub use diesel_sale_repository::DieselSaleRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
