//! Dashboard statistics over the caller's scoped sale set.
//!
//! ```text
//! GET /api/v1/stats/summary
//! GET /api/v1/stats/by-product
//! GET /api/v1/stats/by-advisor      empty for advisors
//! GET /api/v1/stats/timeline?granularity=day|week|month
//! GET /api/v1/stats/top-products?n=5
//! GET /api/v1/stats/recent?n=10
//! ```
//!
//! Every endpoint also accepts the sale filter parameters.

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;

use crate::domain::SaleView;
use crate::domain::sales::stats::{
    AdvisorTotals, Granularity, ProductTotals, SalesSummary, TimelineBucket,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::schemas::ErrorEnvelopeSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::SaleFilterQuery;

/// `n` query parameter for ranked endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RankingQuery {
    /// How many entries to return; the endpoint picks the default.
    pub n: Option<u32>,
}

/// `granularity` query parameter for the timeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineQuery {
    /// `day`, `week` or `month`; `day` when omitted.
    pub granularity: Option<String>,
}

/// Count, sum, average and per-status breakdown.
#[utoipa::path(
    get,
    path = "/api/v1/stats/summary",
    params(
        ("productId" = Option<i32>, Query, description = "Only this product"),
        ("status" = Option<String>, Query, description = "open, in_process or finished"),
        ("startDate" = Option<String>, Query, description = "YYYY-MM-DD or RFC 3339, inclusive"),
        ("endDate" = Option<String>, Query, description = "YYYY-MM-DD or RFC 3339, inclusive"),
        ("creatorUserId" = Option<String>, Query, description = "Admin only")
    ),
    responses(
        (status = 200, description = "Summary", body = ApiResponse<SalesSummary>),
        (status = 400, description = "Invalid filter", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["stats"],
    operation_id = "statsSummary",
    security(("SessionCookie" = []))
)]
#[get("/stats/summary")]
pub async fn summary(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<SaleFilterQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let filter = filter.into_inner().into_filter()?;
    let summary = state.stats.summary(&caller, filter).await?;
    Ok(ApiResponse::ok("Summary computed", summary))
}

/// Count and amount per catalog product.
#[utoipa::path(
    get,
    path = "/api/v1/stats/by-product",
    responses(
        (status = 200, description = "Per-product totals", body = ApiResponse<Vec<ProductTotals>>),
        (status = 400, description = "Invalid filter", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["stats"],
    operation_id = "statsByProduct",
    security(("SessionCookie" = []))
)]
#[get("/stats/by-product")]
pub async fn by_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<SaleFilterQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let filter = filter.into_inner().into_filter()?;
    let totals = state.stats.by_product(&caller, filter).await?;
    Ok(ApiResponse::ok("Product totals computed", totals))
}

/// Count and amount per advisor; empty unless the caller is an admin.
#[utoipa::path(
    get,
    path = "/api/v1/stats/by-advisor",
    responses(
        (status = 200, description = "Per-advisor totals", body = ApiResponse<Vec<AdvisorTotals>>),
        (status = 400, description = "Invalid filter", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["stats"],
    operation_id = "statsByAdvisor",
    security(("SessionCookie" = []))
)]
#[get("/stats/by-advisor")]
pub async fn by_advisor(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<SaleFilterQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let filter = filter.into_inner().into_filter()?;
    let totals = state.stats.by_advisor(&caller, filter).await?;
    Ok(ApiResponse::ok("Advisor totals computed", totals))
}

/// Sales bucketed by creation day, ISO week or month.
#[utoipa::path(
    get,
    path = "/api/v1/stats/timeline",
    params(("granularity" = Option<String>, Query, description = "day (default), week or month")),
    responses(
        (status = 200, description = "Timeline", body = ApiResponse<Vec<TimelineBucket>>),
        (status = 400, description = "Invalid filter or granularity", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["stats"],
    operation_id = "statsTimeline",
    security(("SessionCookie" = []))
)]
#[get("/stats/timeline")]
pub async fn timeline(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<SaleFilterQuery>,
    query: web::Query<TimelineQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let filter = filter.into_inner().into_filter()?;
    let granularity = query
        .granularity
        .as_deref()
        .map(str::parse::<Granularity>)
        .transpose()?
        .unwrap_or_default();
    let buckets = state.stats.timeline(&caller, filter, granularity).await?;
    Ok(ApiResponse::ok("Timeline computed", buckets))
}

/// Best-selling products by count.
#[utoipa::path(
    get,
    path = "/api/v1/stats/top-products",
    params(("n" = Option<u32>, Query, description = "How many, default 5, max 50")),
    responses(
        (status = 200, description = "Top products", body = ApiResponse<Vec<ProductTotals>>),
        (status = 400, description = "Invalid filter or n", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["stats"],
    operation_id = "statsTopProducts",
    security(("SessionCookie" = []))
)]
#[get("/stats/top-products")]
pub async fn top_products(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<SaleFilterQuery>,
    query: web::Query<RankingQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let filter = filter.into_inner().into_filter()?;
    let ranked = state.stats.top_products(&caller, filter, query.n).await?;
    Ok(ApiResponse::ok("Top products computed", ranked))
}

/// Most recently created sales.
#[utoipa::path(
    get,
    path = "/api/v1/stats/recent",
    params(("n" = Option<u32>, Query, description = "How many, default 10, max 50")),
    responses(
        (status = 200, description = "Recent sales", body = ApiResponse<Vec<SaleView>>),
        (status = 400, description = "Invalid filter or n", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["stats"],
    operation_id = "statsRecent",
    security(("SessionCookie" = []))
)]
#[get("/stats/recent")]
pub async fn recent(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<SaleFilterQuery>,
    query: web::Query<RankingQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let filter = filter.into_inner().into_filter()?;
    let sales = state.stats.recent(&caller, filter, query.n).await?;
    Ok(ApiResponse::ok("Recent sales retrieved", sales))
}
