//! Request rejection adapter.
//!
//! Turns [`ValidationResult::Invalid`] outcomes, malformed bodies and
//! unparsable query strings into the uniform validation envelope:
//!
//! ```json
//! { "statusCode": 400, "message": "Validation failed", "errors": [{ "field": "email", "message": "Invalid email address" }] }
//! ```
//!
//! Building the envelope cannot fail; every rejected request terminates with
//! exactly one well-formed 400 response.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use tracing::debug;

use crate::domain::validation::{FieldError, FieldErrorKind, ValidationResult};
use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Top-level message of every validation rejection.
pub const VALIDATION_FAILED: &str = "Validation failed";
/// Field reported when the request body cannot be read as JSON.
pub const BODY_FIELD: &str = "body";
/// Field reported when the query string cannot be decoded.
pub const QUERY_FIELD: &str = "query";

const MALFORMED_BODY: &str = "Request body must be a valid JSON object";
const MALFORMED_QUERY: &str = "Query string could not be parsed";

/// Validation failure envelope returned with status 400.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRejection {
    status_code: u16,
    message: &'static str,
    errors: Vec<FieldError>,
}

impl ValidationRejection {
    /// Envelope listing `errors` in the order they were recorded.
    #[must_use]
    pub fn from_field_errors(errors: Vec<FieldError>) -> Self {
        Self {
            status_code: StatusCode::BAD_REQUEST.as_u16(),
            message: VALIDATION_FAILED,
            errors,
        }
    }

    /// Generic single-error envelope for a body that is not valid JSON.
    #[must_use]
    pub fn malformed_body() -> Self {
        Self::from_field_errors(vec![FieldError::new(
            BODY_FIELD,
            MALFORMED_BODY,
            FieldErrorKind::TypeMismatch,
        )])
    }

    /// Generic single-error envelope for an undecodable query string.
    #[must_use]
    pub fn malformed_query() -> Self {
        Self::from_field_errors(vec![FieldError::new(
            QUERY_FIELD,
            MALFORMED_QUERY,
            FieldErrorKind::TypeMismatch,
        )])
    }

    /// Field errors carried by the envelope.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

impl std::fmt::Display for ValidationRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} errors)", self.message, self.errors.len())
    }
}

impl ResponseError for ValidationRejection {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        builder.content_type(ContentType::json());
        if let Some(id) = TraceId::current() {
            builder.insert_header((TRACE_ID_HEADER, id.to_string()));
        }
        builder.json(self)
    }
}

/// Map a validation outcome onto the rejection envelope.
///
/// Returns `None` for [`ValidationResult::Valid`]; callers forward those to
/// business logic.
///
/// # Examples
/// ```
/// use marketplace_api::domain::validation::{FieldError, ValidationResult};
/// use marketplace_api::inbound::http::rejection::to_error_response;
///
/// let invalid: ValidationResult = ValidationResult::Invalid(vec![FieldError::missing(
///     "email",
///     "Email is required",
/// )]);
/// let rejection = to_error_response(invalid).expect("invalid results reject");
/// assert_eq!(rejection.errors().len(), 1);
/// ```
#[must_use]
pub fn to_error_response<T>(result: ValidationResult<T>) -> Option<ValidationRejection> {
    match result {
        ValidationResult::Valid(_) => None,
        ValidationResult::Invalid(errors) => Some(ValidationRejection::from_field_errors(errors)),
    }
}

/// `JsonConfig` error handler producing the generic body rejection.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "request body rejected before validation");
    ValidationRejection::malformed_body().into()
}

/// `QueryConfig` error handler producing the generic query rejection.
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "query string rejected before validation");
    ValidationRejection::malformed_query().into()
}
