//! OpenAPI schema definitions for error payloads.
//!
//! `domain::Error` stays free of OpenAPI derives; these mirrors describe its
//! wire shape inside the failure envelope.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// Input failed a field or business rule.
    #[schema(rename = "validation_failure")]
    ValidationFailure,
    /// A referenced product, franchise or role does not exist.
    #[schema(rename = "reference_not_found")]
    ReferenceNotFound,
    /// Missing session or bad credentials.
    #[schema(rename = "authentication_failure")]
    AuthenticationFailure,
    /// Authenticated but not permitted.
    #[schema(rename = "authorization_failure")]
    AuthorizationFailure,
    /// The addressed record does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A unique value is already taken.
    #[schema(rename = "duplicate_entry")]
    DuplicateEntry,
    /// The store failed; details are withheld.
    #[schema(rename = "store_failure")]
    StoreFailure,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "validation_failure")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "rate is required for Consumer Credit")]
    message: String,
    /// Field-level context such as `{"field": "rate"}`.
    details: Option<serde_json::Value>,
    /// Correlation identifier, echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
}

/// OpenAPI schema for the failure envelope.
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    /// Always `false`.
    success: bool,
    /// Error payload.
    error: ErrorSchema,
}

/// OpenAPI schema for [`pagination::PageInfo`].
#[derive(ToSchema)]
#[schema(as = PageInfo)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageInfoSchema {
    /// 1-based page number.
    page: u32,
    /// Page size applied.
    limit: u32,
    /// Rows matching the filter across all pages.
    total: u64,
    /// `ceil(total / limit)`.
    #[schema(rename = "totalPages")]
    total_pages: u64,
}

/// OpenAPI schema for a page of sales.
#[derive(ToSchema)]
#[schema(as = SalePage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SalePageSchema {
    items: Vec<crate::domain::SaleView>,
    pagination: PageInfoSchema,
}

/// OpenAPI schema for a page of users.
#[derive(ToSchema)]
#[schema(as = UserPage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserPageSchema {
    items: Vec<crate::inbound::http::users::UserResponse>,
    pagination: PageInfoSchema,
}

#[cfg(test)]
mod tests {
    use utoipa::PartialSchema;

    use super::*;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "validation_failure",
            "reference_not_found",
            "authentication_failure",
            "authorization_failure",
            "not_found",
            "duplicate_entry",
            "store_failure",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_uses_camel_case_trace_id() {
        assert_eq!(ErrorSchema::name(), "Error");
        let schema_json = schema_to_json::<ErrorSchema>();
        assert!(schema_json.contains("traceId"));
        assert!(!schema_json.contains("trace_id"));
    }
}
