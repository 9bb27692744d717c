//! PostgreSQL-backed `SaleRepository` implementation using Diesel ORM.
//!
//! The read model joins products, franchises and the creating user in a
//! single statement. Listing, counting and aggregate loading all apply the
//! scoped filter through `apply_scope!` so they cannot drift apart.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{PageParams, Paginated};

use crate::domain::ports::{SalePersistenceError, SaleRepository};
use crate::domain::sales::scope::ScopedSaleFilter;
use crate::domain::{
    FranchiseId, ProductId, Sale, SaleFields, SaleId, SaleStatus, SaleView, UserId,
};

use super::error_mapping::DbFailure;
use super::models::{NewSaleRow, SaleRow, SaleUpdate};
use super::pool::DbPool;
use super::schema::{franchises, products, sales, users};

/// Diesel-backed implementation of the sale repository port.
#[derive(Clone)]
pub struct DieselSaleRepository {
    pool: DbPool,
}

impl DieselSaleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DbFailure>) -> SalePersistenceError {
    match failure.into() {
        DbFailure::Connection(message) => SalePersistenceError::connection(message),
        DbFailure::ForeignKeyViolation(constraint) => {
            SalePersistenceError::missing_reference(constraint)
        }
        DbFailure::UniqueViolation(message) | DbFailure::Query(message) => {
            SalePersistenceError::query(message)
        }
    }
}

/// Narrow a boxed `sales` query by a scoped filter.
macro_rules! apply_scope {
    ($query:expr, $filter:expr) => {{
        let filter: &ScopedSaleFilter = $filter;
        let mut query = $query;
        if let Some(creator) = filter.creator_user_id() {
            query = query.filter(sales::creator_user_id.eq(*creator.as_uuid()));
        }
        if let Some(product_id) = filter.product_id() {
            query = query.filter(sales::product_id.eq(product_id.0));
        }
        if let Some(status) = filter.status() {
            query = query.filter(sales::status.eq(status.as_str()));
        }
        if let Some(from) = filter.created_from() {
            query = query.filter(sales::created_at.ge(from));
        }
        if let Some(to) = filter.created_to() {
            query = query.filter(sales::created_at.le(to));
        }
        query
    }};
}

/// `sales` joined with everything the read model denormalises.
macro_rules! view_source {
    () => {
        sales::table
            .inner_join(products::table)
            .left_join(franchises::table)
            .inner_join(users::table.on(users::id.eq(sales::creator_user_id)))
    };
}

macro_rules! view_columns {
    () => {
        (
            SaleRow::as_select(),
            products::name,
            franchises::name.nullable(),
            users::name,
        )
    };
}

/// Read-model rows, newest first.
macro_rules! ordered_views {
    () => {
        view_source!()
            .select(view_columns!())
            .order((sales::created_at.desc(), sales::id.desc()))
    };
}

type ViewTuple = (SaleRow, String, Option<String>, String);

fn row_to_sale(row: SaleRow) -> Result<Sale, SalePersistenceError> {
    let status = row
        .status
        .parse::<SaleStatus>()
        .map_err(|err| SalePersistenceError::query(err.to_string()))?;
    Ok(Sale {
        id: SaleId::from(row.id),
        fields: SaleFields {
            product_id: ProductId(row.product_id),
            requested_amount: row.requested_amount,
            franchise_id: row.franchise_id.map(FranchiseId),
            rate: row.rate,
        },
        status,
        creator_user_id: UserId::from(row.creator_user_id),
        updater_user_id: UserId::from(row.updater_user_id),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn tuple_to_view(
    (row, product_name, franchise_name, creator_name): ViewTuple,
) -> Result<SaleView, SalePersistenceError> {
    let sale = row_to_sale(row)?;
    Ok(SaleView {
        id: sale.id,
        product_id: sale.fields.product_id,
        product_name,
        requested_amount: sale.fields.requested_amount,
        franchise_id: sale.fields.franchise_id,
        franchise_name,
        rate: sale.fields.rate,
        status: sale.status,
        creator_user_id: sale.creator_user_id,
        creator_name,
        updater_user_id: sale.updater_user_id,
        created_at: sale.created_at,
        updated_at: sale.updated_at,
    })
}

fn to_views(rows: Vec<ViewTuple>) -> Result<Vec<SaleView>, SalePersistenceError> {
    rows.into_iter().map(tuple_to_view).collect()
}

fn to_i64(value: u64, what: &str) -> Result<i64, SalePersistenceError> {
    i64::try_from(value).map_err(|_| SalePersistenceError::query(format!("{what} out of range")))
}

#[async_trait]
impl SaleRepository for DieselSaleRepository {
    async fn insert(&self, sale: &Sale) -> Result<(), SalePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewSaleRow {
            id: *sale.id.as_uuid(),
            product_id: sale.fields.product_id.0,
            requested_amount: sale.fields.requested_amount,
            franchise_id: sale.fields.franchise_id.map(|id| id.0),
            rate: sale.fields.rate,
            status: sale.status.as_str(),
            creator_user_id: *sale.creator_user_id.as_uuid(),
            updater_user_id: *sale.updater_user_id.as_uuid(),
            created_at: sale.created_at,
            updated_at: sale.updated_at,
        };
        diesel::insert_into(sales::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_failure)
    }

    async fn update(&self, sale: &Sale) -> Result<bool, SalePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let changes = SaleUpdate {
            product_id: sale.fields.product_id.0,
            requested_amount: sale.fields.requested_amount,
            franchise_id: sale.fields.franchise_id.map(|id| id.0),
            rate: sale.fields.rate,
            status: sale.status.as_str(),
            updater_user_id: *sale.updater_user_id.as_uuid(),
            updated_at: sale.updated_at,
        };
        diesel::update(sales::table.find(*sale.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_failure)
    }

    async fn delete(&self, id: &SaleId) -> Result<bool, SalePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        diesel::delete(sales::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_failure)
    }

    async fn find_by_id(&self, id: &SaleId) -> Result<Option<Sale>, SalePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = sales::table
            .find(*id.as_uuid())
            .select(SaleRow::as_select())
            .first::<SaleRow>(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        row.map(row_to_sale).transpose()
    }

    async fn find_view(&self, id: &SaleId) -> Result<Option<SaleView>, SalePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = view_source!()
            .filter(sales::id.eq(*id.as_uuid()))
            .select(view_columns!())
            .first::<ViewTuple>(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        row.map(tuple_to_view).transpose()
    }

    async fn list(
        &self,
        filter: &ScopedSaleFilter,
        page: PageParams,
    ) -> Result<Paginated<SaleView>, SalePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let total: i64 = apply_scope!(sales::table.count().into_boxed(), filter)
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        let rows: Vec<ViewTuple> = apply_scope!(ordered_views!().into_boxed(), filter)
            .limit(i64::from(page.limit()))
            .offset(to_i64(page.offset(), "offset")?)
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        let total = u64::try_from(total).unwrap_or_default();
        Ok(Paginated::new(to_views(rows)?, page, total))
    }

    async fn load_scoped(
        &self,
        filter: &ScopedSaleFilter,
    ) -> Result<Vec<SaleView>, SalePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<ViewTuple> = apply_scope!(ordered_views!().into_boxed(), filter)
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        to_views(rows)
    }
}
