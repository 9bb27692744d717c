//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the request, response and error schemas they reference, plus the
//! session cookie security scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::sales::stats::{
    AdvisorTotals, ProductTotals, SaleTotals, SalesSummary, StatusCount, TimelineBucket,
};
use crate::domain::{ConditionalField, FieldRule, Franchise, Product, RoleRecord, SaleStatus, SaleView};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::sales::{CreateSaleRequest, UpdateSaleRequest};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorEnvelopeSchema, ErrorSchema, PageInfoSchema, SalePageSchema,
    UserPageSchema,
};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use crate::inbound::http::users::{
    ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UserResponse,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Salesdesk API",
        description = "Role-scoped tracking of bank product sales: authentication, \
                       sale lifecycle, statistics and user administration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::sales::list_sales,
        crate::inbound::http::sales::sales_total,
        crate::inbound::http::sales::count_by_status,
        crate::inbound::http::sales::my_sales,
        crate::inbound::http::sales::get_sale,
        crate::inbound::http::sales::create_sale,
        crate::inbound::http::sales::update_sale,
        crate::inbound::http::sales::delete_sale,
        crate::inbound::http::stats::summary,
        crate::inbound::http::stats::by_product,
        crate::inbound::http::stats::by_advisor,
        crate::inbound::http::stats::timeline,
        crate::inbound::http::stats::top_products,
        crate::inbound::http::stats::recent,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::change_password,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::catalog::list_products,
        crate::inbound::http::catalog::list_franchises,
        crate::inbound::http::catalog::list_roles,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ErrorEnvelopeSchema,
        PageInfoSchema,
        SalePageSchema,
        UserPageSchema,
        LoginRequest,
        UserResponse,
        CreateUserRequest,
        UpdateUserRequest,
        ChangePasswordRequest,
        CreateSaleRequest,
        UpdateSaleRequest,
        SaleView,
        SaleStatus,
        SaleTotals,
        StatusCount,
        SalesSummary,
        ProductTotals,
        AdvisorTotals,
        TimelineBucket,
        Product,
        Franchise,
        RoleRecord,
        FieldRule,
        ConditionalField,
    )),
    tags(
        (name = "auth", description = "Login, logout and the current session"),
        (name = "sales", description = "Sale registration and role-scoped queries"),
        (name = "stats", description = "Aggregates over the caller's visible sales"),
        (name = "users", description = "Account administration"),
        (name = "catalog", description = "Products, franchises and roles"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
