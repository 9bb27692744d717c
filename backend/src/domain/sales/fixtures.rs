//! Builders shared by the sale unit tests.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use super::{Sale, SaleFields, SaleId, SaleStatus, SaleView};
use crate::domain::catalog::{Catalog, FranchiseId, ProductId};
use crate::domain::{User, UserId};

pub(crate) fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn card_fields(amount: Decimal) -> SaleFields {
    SaleFields {
        product_id: ProductId(3),
        requested_amount: amount,
        franchise_id: Some(FranchiseId(2)),
        rate: None,
    }
}

pub(crate) fn credit_fields(amount: Decimal, rate: Decimal) -> SaleFields {
    SaleFields {
        product_id: ProductId(1),
        requested_amount: amount,
        franchise_id: None,
        rate: Some(rate),
    }
}

pub(crate) fn sale(fields: SaleFields, creator: UserId, created_at: DateTime<Utc>) -> Sale {
    Sale {
        id: SaleId::random(),
        fields,
        status: SaleStatus::Open,
        creator_user_id: creator,
        updater_user_id: creator,
        created_at,
        updated_at: created_at,
    }
}

pub(crate) fn view_of(sale: &Sale, creator_name: &str) -> SaleView {
    let catalog = Catalog::seeded();
    let product_name = catalog
        .product(sale.fields.product_id)
        .map(|product| product.name.clone())
        .unwrap_or_default();
    let franchise_name = sale
        .fields
        .franchise_id
        .and_then(|id| catalog.franchise(id))
        .map(|franchise| franchise.name.clone());
    SaleView {
        id: sale.id,
        product_id: sale.fields.product_id,
        product_name,
        requested_amount: sale.fields.requested_amount,
        franchise_id: sale.fields.franchise_id,
        franchise_name,
        rate: sale.fields.rate,
        status: sale.status,
        creator_user_id: sale.creator_user_id,
        creator_name: creator_name.to_owned(),
        updater_user_id: sale.updater_user_id,
        created_at: sale.created_at,
        updated_at: sale.updated_at,
    }
}

pub(crate) fn view(
    fields: SaleFields,
    status: SaleStatus,
    creator: &User,
    created_at: DateTime<Utc>,
) -> SaleView {
    let mut record = sale(fields, creator.id, created_at);
    record.status = status;
    view_of(&record, creator.name.as_ref())
}
