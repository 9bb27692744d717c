//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::trace_id::TraceId;

/// HTTP header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed input or a conditional-field violation.
    ValidationFailure,
    /// A foreign id (product, franchise, role) is not in its catalog.
    ReferenceNotFound,
    /// Identity is missing or invalid.
    AuthenticationFailure,
    /// Identity is valid but lacks the required role or ownership.
    AuthorizationFailure,
    /// The requested entity does not exist.
    NotFound,
    /// A uniqueness constraint was violated.
    DuplicateEntry,
    /// The backing store failed; details stay server-side.
    StoreFailure,
}

impl ErrorCode {
    /// Snake-case identifier as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailure => "validation_failure",
            Self::ReferenceNotFound => "reference_not_found",
            Self::AuthenticationFailure => "authentication_failure",
            Self::AuthorizationFailure => "authorization_failure",
            Self::NotFound => "not_found",
            Self::DuplicateEntry => "duplicate_entry",
            Self::StoreFailure => "store_failure",
        }
    }
}

/// Domain error payload.
///
/// Constructors capture the trace identifier in scope (see
/// [`TraceId::current`]) so adapters can correlate the failure with logs.
///
/// # Examples
/// ```
/// use salesdesk::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("sale missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "sale missing");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

impl Error {
    /// Create a new error, capturing the current trace identifier if any.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Correlation identifier captured when the error was created.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use salesdesk::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::validation("bad").with_details(json!({ "field": "rate" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach an explicit trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Convenience constructor for [`ErrorCode::ValidationFailure`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailure, message)
    }

    /// Convenience constructor for [`ErrorCode::ReferenceNotFound`].
    pub fn reference_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ReferenceNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::AuthenticationFailure`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthenticationFailure, message)
    }

    /// Convenience constructor for [`ErrorCode::AuthorizationFailure`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthorizationFailure, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::DuplicateEntry`].
    pub fn duplicate_entry(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateEntry, message)
    }

    /// Convenience constructor for [`ErrorCode::StoreFailure`].
    pub fn store_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreFailure, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for Error {}
