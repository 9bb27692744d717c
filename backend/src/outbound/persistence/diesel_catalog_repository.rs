//! PostgreSQL-backed `CatalogRepository` reading the seeded reference tables.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogPersistenceError, CatalogRepository};
use crate::domain::{
    Catalog, ConditionalField, FieldRule, Franchise, FranchiseId, Product, ProductId, RoleRecord,
};

use super::error_mapping::DbFailure;
use super::models::{FranchiseRow, ProductRow, RoleRow};
use super::pool::DbPool;
use super::schema::{franchises, products, roles};

/// Diesel-backed implementation of the catalog repository port.
#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DbFailure>) -> CatalogPersistenceError {
    match failure.into() {
        DbFailure::Connection(message) => CatalogPersistenceError::connection(message),
        DbFailure::UniqueViolation(message)
        | DbFailure::ForeignKeyViolation(message)
        | DbFailure::Query(message) => CatalogPersistenceError::query(message),
    }
}

fn parse_field(raw: Option<String>) -> Result<Option<ConditionalField>, CatalogPersistenceError> {
    raw.map(|value| {
        ConditionalField::parse(&value).ok_or_else(|| {
            CatalogPersistenceError::query(format!("unknown conditional field `{value}`"))
        })
    })
    .transpose()
}

fn row_to_product(row: ProductRow) -> Result<Product, CatalogPersistenceError> {
    Ok(Product {
        id: ProductId(row.id),
        name: row.name,
        rule: FieldRule {
            required: parse_field(row.required_field)?,
            forbidden: parse_field(row.forbidden_field)?,
        },
    })
}

#[async_trait]
impl CatalogRepository for DieselCatalogRepository {
    async fn load(&self) -> Result<Catalog, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let product_rows: Vec<ProductRow> = products::table
            .select(ProductRow::as_select())
            .order(products::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        let franchise_rows: Vec<FranchiseRow> = franchises::table
            .select(FranchiseRow::as_select())
            .order(franchises::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        let role_rows: Vec<RoleRow> = roles::table
            .select(RoleRow::as_select())
            .order(roles::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;

        Ok(Catalog {
            products: product_rows
                .into_iter()
                .map(row_to_product)
                .collect::<Result<_, _>>()?,
            franchises: franchise_rows
                .into_iter()
                .map(|row| Franchise {
                    id: FranchiseId(row.id),
                    name: row.name,
                })
                .collect(),
            roles: role_rows
                .into_iter()
                .map(|row| RoleRecord {
                    id: row.id,
                    name: row.name,
                })
                .collect(),
        })
    }
}
