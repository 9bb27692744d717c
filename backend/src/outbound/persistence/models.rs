//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::schema::{franchises, products, roles, sales, users};

// ---------------------------------------------------------------------------
// Reference tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoleRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: i32,
    pub name: String,
    pub required_field: Option<String>,
    pub forbidden_field: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = franchises)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FranchiseRow {
    pub id: i32,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile changeset; the password hash has its own statement.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role_id: i32,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

/// Row struct for reading from the sales table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sales)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SaleRow {
    pub id: Uuid,
    pub product_id: i32,
    pub requested_amount: Decimal,
    pub franchise_id: Option<i32>,
    pub rate: Option<Decimal>,
    pub status: String,
    pub creator_user_id: Uuid,
    pub updater_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating sale records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sales)]
pub(crate) struct NewSaleRow<'a> {
    pub id: Uuid,
    pub product_id: i32,
    pub requested_amount: Decimal,
    pub franchise_id: Option<i32>,
    pub rate: Option<Decimal>,
    pub status: &'a str,
    pub creator_user_id: Uuid,
    pub updater_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full overwrite of the mutable sale columns. `None` clears a column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = sales)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct SaleUpdate<'a> {
    pub product_id: i32,
    pub requested_amount: Decimal,
    pub franchise_id: Option<i32>,
    pub rate: Option<Decimal>,
    pub status: &'a str,
    pub updater_user_id: Uuid,
    pub updated_at: DateTime<Utc>,
}
