//! Success envelope shared by every JSON endpoint.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::cache_control::private_no_cache_header;

/// `{"success": true, "message": ..., "data": ...}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Short human-readable outcome.
    pub message: String,
    /// Payload; `null` for deletions.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap `data` with a message.
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    /// Render as `200 OK`.
    pub fn ok(message: impl Into<String>, data: T) -> HttpResponse {
        Self::new(message, data).respond(StatusCode::OK)
    }

    /// Render as `201 Created`.
    pub fn created(message: impl Into<String>, data: T) -> HttpResponse {
        Self::new(message, data).respond(StatusCode::CREATED)
    }

    fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status)
            .insert_header(private_no_cache_header())
            .json(self)
    }
}

impl ApiResponse<()> {
    /// Render a payload-less `200 OK` with `data: null`.
    pub fn empty(message: impl Into<String>) -> HttpResponse {
        ApiResponse::ok(message, ())
    }
}
