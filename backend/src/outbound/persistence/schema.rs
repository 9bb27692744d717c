//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly.

diesel::table! {
    /// Fixed application roles.
    roles (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    /// Product catalog with conditional field rules.
    products (id) {
        id -> Int4,
        name -> Varchar,
        /// `franchiseId` or `rate`.
        required_field -> Nullable<Varchar>,
        /// `franchiseId` or `rate`.
        forbidden_field -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Card franchises.
    franchises (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    /// User accounts. `email` is stored lower-cased and unique.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        role_id -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sale records.
    sales (id) {
        id -> Uuid,
        product_id -> Int4,
        requested_amount -> Numeric,
        franchise_id -> Nullable<Int4>,
        rate -> Nullable<Numeric>,
        status -> Varchar,
        creator_user_id -> Uuid,
        updater_user_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(users -> roles (role_id));
diesel::joinable!(sales -> products (product_id));
diesel::joinable!(sales -> franchises (franchise_id));

diesel::allow_tables_to_appear_in_same_query!(franchises, products, roles, sales, users);
