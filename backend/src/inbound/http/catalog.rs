//! Reference data endpoints.
//!
//! ```text
//! GET /api/v1/products
//! GET /api/v1/franchises
//! GET /api/v1/roles        admin only
//! ```

use actix_web::{HttpResponse, get, web};

use crate::domain::{Franchise, Product, RoleRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::schemas::ErrorEnvelopeSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Products with their conditional field rules.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses(
        (status = 200, description = "Products", body = ApiResponse<Vec<Product>>),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["catalog"],
    operation_id = "listProducts",
    security(("SessionCookie" = []))
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.caller(state.login.as_ref()).await?;
    let products = state.catalog.products().await?;
    Ok(ApiResponse::ok("Products retrieved", products))
}

/// Card franchises.
#[utoipa::path(
    get,
    path = "/api/v1/franchises",
    responses(
        (status = 200, description = "Franchises", body = ApiResponse<Vec<Franchise>>),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["catalog"],
    operation_id = "listFranchises",
    security(("SessionCookie" = []))
)]
#[get("/franchises")]
pub async fn list_franchises(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.caller(state.login.as_ref()).await?;
    let franchises = state.catalog.franchises().await?;
    Ok(ApiResponse::ok("Franchises retrieved", franchises))
}

/// Assignable roles.
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    responses(
        (status = 200, description = "Roles", body = ApiResponse<Vec<RoleRecord>>),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["catalog"],
    operation_id = "listRoles",
    security(("SessionCookie" = []))
)]
#[get("/roles")]
pub async fn list_roles(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let roles = state.catalog.roles(&caller).await?;
    Ok(ApiResponse::ok("Roles retrieved", roles))
}
