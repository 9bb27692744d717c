//! Sale endpoints.
//!
//! ```text
//! GET    /api/v1/sales                  scoped, filtered, paginated
//! GET    /api/v1/sales/total
//! GET    /api/v1/sales/count-by-status
//! GET    /api/v1/sales/my-sales
//! GET    /api/v1/sales/{id}
//! POST   /api/v1/sales
//! PUT    /api/v1/sales/{id}             partial; null clears franchiseId/rate
//! DELETE /api/v1/sales/{id}
//! ```
//!
//! Listing, totals and counts all pass the same [`SaleFilterQuery`] through
//! the role-scoped filter, so a total always matches the rows it summarises.

use actix_web::{HttpResponse, delete, get, post, put, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::sales::stats::{SaleTotals, StatusCount};
use crate::domain::{FranchiseId, ProductId, SaleDraft, SaleFields, SalePatch, SaleView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::schemas::{ErrorEnvelopeSchema, SalePageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, PageQuery, SaleFilterQuery, nullable, page_params, parse_sale_id, parse_status,
};

/// Body for `POST /api/v1/sales`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    /// Catalog product being sold.
    #[schema(example = 3)]
    pub product_id: i32,
    /// Positive amount with at most two decimals.
    #[schema(value_type = String, example = "1500.00")]
    pub requested_amount: Decimal,
    /// Card franchise; required for credit cards, rejected otherwise.
    #[schema(example = 2)]
    pub franchise_id: Option<i32>,
    /// Interest rate percentage; required for credit products, rejected for cards.
    #[schema(value_type = Option<String>, example = "12.50")]
    pub rate: Option<Decimal>,
    /// `open` when omitted.
    #[schema(example = "open")]
    pub status: Option<String>,
}

impl CreateSaleRequest {
    fn into_draft(self) -> ApiResult<SaleDraft> {
        Ok(SaleDraft {
            fields: SaleFields {
                product_id: ProductId(self.product_id),
                requested_amount: self.requested_amount,
                franchise_id: self.franchise_id.map(FranchiseId),
                rate: self.rate,
            },
            status: self
                .status
                .as_deref()
                .map(|raw| parse_status(raw, FieldName::new("status")))
                .transpose()?,
        })
    }
}

/// Body for `PUT /api/v1/sales/{id}`.
///
/// Omitted keys keep their stored value; `"franchiseId": null` and
/// `"rate": null` clear the field.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleRequest {
    /// Replacement product.
    pub product_id: Option<i32>,
    /// Replacement amount.
    #[schema(value_type = Option<String>)]
    pub requested_amount: Option<Decimal>,
    /// Replacement franchise, or `null` to clear it.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub franchise_id: Option<Option<i32>>,
    /// Replacement rate, or `null` to clear it.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub rate: Option<Option<Decimal>>,
    /// `open`, `in_process` or `finished`.
    pub status: Option<String>,
}

impl UpdateSaleRequest {
    fn into_patch(self) -> ApiResult<SalePatch> {
        Ok(SalePatch {
            product_id: self.product_id.map(ProductId),
            requested_amount: self.requested_amount,
            franchise_id: self.franchise_id.map(|inner| inner.map(FranchiseId)),
            rate: self.rate,
            status: self
                .status
                .as_deref()
                .map(|raw| parse_status(raw, FieldName::new("status")))
                .transpose()?,
        })
    }
}

/// List sales visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/sales",
    params(
        ("productId" = Option<i32>, Query, description = "Only this product"),
        ("status" = Option<String>, Query, description = "open, in_process or finished"),
        ("startDate" = Option<String>, Query, description = "YYYY-MM-DD or RFC 3339, inclusive"),
        ("endDate" = Option<String>, Query, description = "YYYY-MM-DD or RFC 3339, inclusive"),
        ("creatorUserId" = Option<String>, Query, description = "Admin only; ignored for advisors"),
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Sales", body = ApiResponse<SalePageSchema>),
        (status = 400, description = "Invalid filter", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["sales"],
    operation_id = "listSales",
    security(("SessionCookie" = []))
)]
#[get("/sales")]
pub async fn list_sales(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<SaleFilterQuery>,
    page: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let filter = filter.into_inner().into_filter()?;
    let page = page_params(&state.page_limits, page.page, page.limit)?;
    let sales = state.sales_query.list(&caller, filter, page).await?;
    Ok(ApiResponse::ok("Sales retrieved", sales))
}

/// Sum of requested amounts over the scoped, filtered set.
#[utoipa::path(
    get,
    path = "/api/v1/sales/total",
    params(
        ("productId" = Option<i32>, Query, description = "Only this product"),
        ("status" = Option<String>, Query, description = "open, in_process or finished"),
        ("startDate" = Option<String>, Query, description = "YYYY-MM-DD or RFC 3339, inclusive"),
        ("endDate" = Option<String>, Query, description = "YYYY-MM-DD or RFC 3339, inclusive"),
        ("creatorUserId" = Option<String>, Query, description = "Admin only; ignored for advisors")
    ),
    responses(
        (status = 200, description = "Totals", body = ApiResponse<SaleTotals>),
        (status = 400, description = "Invalid filter", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["sales"],
    operation_id = "salesTotal",
    security(("SessionCookie" = []))
)]
#[get("/sales/total")]
pub async fn sales_total(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<SaleFilterQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let filter = filter.into_inner().into_filter()?;
    let totals = state.sales_query.total(&caller, filter).await?;
    Ok(ApiResponse::ok("Sales total computed", totals))
}

/// Number of scoped sales per status.
#[utoipa::path(
    get,
    path = "/api/v1/sales/count-by-status",
    params(
        ("productId" = Option<i32>, Query, description = "Only this product"),
        ("startDate" = Option<String>, Query, description = "YYYY-MM-DD or RFC 3339, inclusive"),
        ("endDate" = Option<String>, Query, description = "YYYY-MM-DD or RFC 3339, inclusive"),
        ("creatorUserId" = Option<String>, Query, description = "Admin only; ignored for advisors")
    ),
    responses(
        (status = 200, description = "Counts", body = ApiResponse<Vec<StatusCount>>),
        (status = 400, description = "Invalid filter", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["sales"],
    operation_id = "salesCountByStatus",
    security(("SessionCookie" = []))
)]
#[get("/sales/count-by-status")]
pub async fn count_by_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<SaleFilterQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let filter = filter.into_inner().into_filter()?;
    let counts = state.sales_query.count_by_status(&caller, filter).await?;
    Ok(ApiResponse::ok("Sales counted", counts))
}

/// Sales the caller created, for admins and advisors alike.
#[utoipa::path(
    get,
    path = "/api/v1/sales/my-sales",
    params(
        ("productId" = Option<i32>, Query, description = "Only this product"),
        ("status" = Option<String>, Query, description = "open, in_process or finished"),
        ("startDate" = Option<String>, Query, description = "YYYY-MM-DD or RFC 3339, inclusive"),
        ("endDate" = Option<String>, Query, description = "YYYY-MM-DD or RFC 3339, inclusive"),
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Own sales", body = ApiResponse<SalePageSchema>),
        (status = 400, description = "Invalid filter", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["sales"],
    operation_id = "mySales",
    security(("SessionCookie" = []))
)]
#[get("/sales/my-sales")]
pub async fn my_sales(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<SaleFilterQuery>,
    page: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let mut filter = filter.into_inner().into_filter()?;
    filter.creator_user_id = Some(*caller.user_id());
    let page = page_params(&state.page_limits, page.page, page.limit)?;
    let sales = state.sales_query.list(&caller, filter, page).await?;
    Ok(ApiResponse::ok("Sales retrieved", sales))
}

/// Fetch one sale.
#[utoipa::path(
    get,
    path = "/api/v1/sales/{id}",
    params(("id" = String, Path, description = "Sale identifier")),
    responses(
        (status = 200, description = "Sale", body = ApiResponse<SaleView>),
        (status = 400, description = "Invalid id", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Not the owner", body = ErrorEnvelopeSchema),
        (status = 404, description = "Not found", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["sales"],
    operation_id = "getSale",
    security(("SessionCookie" = []))
)]
#[get("/sales/{id}")]
pub async fn get_sale(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let id = parse_sale_id(&path)?;
    let sale = state.sales_query.get(&caller, &id).await?;
    Ok(ApiResponse::ok("Sale retrieved", sale))
}

/// Record a sale owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/sales",
    request_body = CreateSaleRequest,
    responses(
        (status = 201, description = "Sale created", body = ApiResponse<SaleView>),
        (status = 400, description = "Validation failure or unknown reference", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["sales"],
    operation_id = "createSale",
    security(("SessionCookie" = []))
)]
#[post("/sales")]
pub async fn create_sale(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateSaleRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let draft = payload.into_inner().into_draft()?;
    let sale = state.sales.create(&caller, draft).await?;
    Ok(ApiResponse::created("Sale created", sale))
}

/// Apply a partial update.
#[utoipa::path(
    put,
    path = "/api/v1/sales/{id}",
    params(("id" = String, Path, description = "Sale identifier")),
    request_body = UpdateSaleRequest,
    responses(
        (status = 200, description = "Sale updated", body = ApiResponse<SaleView>),
        (status = 400, description = "Validation failure or unknown reference", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Not the owner", body = ErrorEnvelopeSchema),
        (status = 404, description = "Not found", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["sales"],
    operation_id = "updateSale",
    security(("SessionCookie" = []))
)]
#[put("/sales/{id}")]
pub async fn update_sale(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateSaleRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let id = parse_sale_id(&path)?;
    let patch = payload.into_inner().into_patch()?;
    let sale = state.sales.update(&caller, &id, patch).await?;
    Ok(ApiResponse::ok("Sale updated", sale))
}

/// Delete a sale.
#[utoipa::path(
    delete,
    path = "/api/v1/sales/{id}",
    params(("id" = String, Path, description = "Sale identifier")),
    responses(
        (status = 200, description = "Sale deleted"),
        (status = 400, description = "Invalid id", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Not the owner", body = ErrorEnvelopeSchema),
        (status = 404, description = "Not found", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["sales"],
    operation_id = "deleteSale",
    security(("SessionCookie" = []))
)]
#[delete("/sales/{id}")]
pub async fn delete_sale(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let id = parse_sale_id(&path)?;
    state.sales.delete(&caller, &id).await?;
    Ok(ApiResponse::empty("Sale deleted"))
}

#[cfg(test)]
#[path = "sales_tests.rs"]
mod tests;
