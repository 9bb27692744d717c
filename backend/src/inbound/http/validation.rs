//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns a `validation_failure` carrying
//! `{"field": ..., "code": ...}` details so clients can highlight the input.

use chrono::{DateTime, Utc};
use pagination::{PageLimits, PageParams, PaginationError};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use uuid::Uuid;

use crate::domain::sales::scope::{BoundSide, SaleFilter, parse_date_bound};
use crate::domain::{Error, ProductId, SaleId, SaleStatus, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidDate,
    InvalidStatus,
    InvalidPage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::InvalidPage => "invalid_page",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::validation(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_sale_id(value: &str) -> Result<SaleId, Error> {
    parse_uuid(value, FieldName::new("id")).map(SaleId::from)
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    parse_uuid(value, field).map(UserId::from)
}

pub(crate) fn parse_status(value: &str, field: FieldName) -> Result<SaleStatus, Error> {
    value.trim().parse().map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidStatus,
            format!("{} must be one of open, in_process, finished", field.as_str()),
            value,
        )
    })
}

fn parse_bound(value: &str, side: BoundSide, field: FieldName) -> Result<DateTime<Utc>, Error> {
    parse_date_bound(value, side)
        .map_err(|err| field_error(field, ErrorCode::InvalidDate, err.to_string(), value))
}

/// Resolve `page`/`limit` against the configured bounds.
pub(crate) fn page_params(
    limits: &PageLimits,
    page: Option<u32>,
    limit: Option<u32>,
) -> Result<PageParams, Error> {
    limits.resolve(page, limit).map_err(|err| {
        let field = match err {
            PaginationError::InvalidLimit => "limit",
            PaginationError::InvalidPage | PaginationError::InvalidLimits { .. } => "page",
        };
        Error::validation(err.to_string()).with_details(json!({
            "field": field,
            "code": ErrorCode::InvalidPage.as_str(),
        }))
    })
}

/// Filter query parameters shared by sale listings and statistics.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleFilterQuery {
    /// Only sales of this product.
    pub product_id: Option<i32>,
    /// `open`, `in_process` or `finished`.
    pub status: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339; bare dates start at 00:00 UTC.
    pub start_date: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339; bare dates run to the end of the day.
    pub end_date: Option<String>,
    /// Only sales created by this user. Ignored for advisors.
    pub creator_user_id: Option<String>,
}

impl SaleFilterQuery {
    /// Parse into a domain filter.
    pub(crate) fn into_filter(self) -> Result<SaleFilter, Error> {
        Ok(SaleFilter {
            product_id: self.product_id.map(ProductId),
            status: self
                .status
                .as_deref()
                .map(|raw| parse_status(raw, FieldName::new("status")))
                .transpose()?,
            creator_user_id: self
                .creator_user_id
                .as_deref()
                .map(|raw| parse_user_id(raw, FieldName::new("creatorUserId")))
                .transpose()?,
            created_from: self
                .start_date
                .as_deref()
                .map(|raw| parse_bound(raw, BoundSide::Start, FieldName::new("startDate")))
                .transpose()?,
            created_to: self
                .end_date
                .as_deref()
                .map(|raw| parse_bound(raw, BoundSide::End, FieldName::new("endDate")))
                .transpose()?,
        })
    }
}

/// `page` and `limit` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, clamped to the configured maximum.
    pub limit: Option<u32>,
}

/// Deserialize a field where absence, `null` and a value mean different things.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`: a missing key
/// stays `None`, `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
