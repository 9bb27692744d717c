//! HTTP adapter mapping for domain errors.
//!
//! Failures render as `{"success": false, "error": {...}}`. Store failures
//! are logged in full and reach clients only as a generic message.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message clients see in place of a store failure.
pub const REDACTED_MESSAGE: &str = "Internal server error";

/// Failure envelope written for every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always `false`.
    pub success: bool,
    /// The error payload.
    pub error: Error,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailure | ErrorCode::ReferenceNotFound => StatusCode::BAD_REQUEST,
        ErrorCode::AuthenticationFailure => StatusCode::UNAUTHORIZED,
        ErrorCode::AuthorizationFailure => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::DuplicateEntry => StatusCode::CONFLICT,
        ErrorCode::StoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_store_failure(error: &Error) -> Error {
    if error.code() != ErrorCode::StoreFailure {
        return error.clone();
    }
    let redacted = Error::store_failure(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        match self.code() {
            ErrorCode::StoreFailure => error!(
                trace_id = self.trace_id().unwrap_or("-"),
                message = self.message(),
                details = ?self.details(),
                "store failure"
            ),
            ErrorCode::AuthorizationFailure => debug!(
                trace_id = self.trace_id().unwrap_or("-"),
                message = self.message(),
                "request denied"
            ),
            _ => {}
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorEnvelope {
            success: false,
            error: redact_if_store_failure(self),
        })
    }
}

/// Turn an extractor rejection into a `validation_failure` response.
fn extractor_error(message: String, source: &str) -> actix_web::Error {
    debug!(%source, %message, "request rejected by extractor");
    Error::validation(message).into()
}

/// Error handler for `web::Json` bodies.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    extractor_error(err.to_string(), "json")
}

/// Error handler for `web::Query` strings.
pub fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    extractor_error(err.to_string(), "query")
}

/// Error handler for `web::Path` segments.
pub fn path_error_handler(
    err: actix_web::error::PathError,
    _req: &HttpRequest,
) -> actix_web::Error {
    extractor_error(err.to_string(), "path")
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
