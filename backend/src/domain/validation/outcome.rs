//! Validation outcomes: field-level errors and the tagged result.

use serde::Serialize;

/// Category of a field-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// A required field is absent or `null`.
    MissingField,
    /// The field (or the payload root) carries the wrong JSON type.
    TypeMismatch,
    /// The field has the right type but breaks a declared rule.
    ConstraintViolation,
}

/// One failure, addressed by dotted field path.
///
/// Only `field` and `message` reach clients; `kind` is kept for logs and
/// callers that branch on the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    field: String,
    message: String,
    #[serde(skip)]
    kind: FieldErrorKind,
}

impl FieldError {
    /// Build an error for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
        }
    }

    /// Missing required field.
    pub fn missing(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, FieldErrorKind::MissingField)
    }

    /// Wrong JSON type, phrased as `Expected <expected>, received <actual>`.
    pub fn type_mismatch(field: impl Into<String>, expected: &str, actual: &str) -> Self {
        Self::new(
            field,
            format!("Expected {expected}, received {actual}"),
            FieldErrorKind::TypeMismatch,
        )
    }

    /// Broken declared rule.
    pub fn constraint(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, FieldErrorKind::ConstraintViolation)
    }

    /// Dotted path of the offending field; empty for the payload root.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Human-readable failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Failure category.
    #[must_use]
    pub fn kind(&self) -> FieldErrorKind {
        self.kind
    }
}

/// Outcome of applying a schema to a value.
///
/// `T` defaults to the projected JSON value; typed narrowing produces a DTO.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum ValidationResult<T = serde_json::Value> {
    /// Every declared rule held.
    Valid(T),
    /// Failures in schema declaration order. Never empty.
    Invalid(Vec<FieldError>),
}

impl<T> ValidationResult<T> {
    /// Whether validation succeeded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Recorded failures; empty for a valid result.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid(_) => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Convert into a standard `Result`.
    ///
    /// # Errors
    /// Returns the failure list for an invalid result.
    pub fn into_result(self) -> Result<T, Vec<FieldError>> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(errors) => Err(errors),
        }
    }

    /// Transform the valid value, leaving failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationResult<U> {
        match self {
            Self::Valid(value) => ValidationResult::Valid(f(value)),
            Self::Invalid(errors) => ValidationResult::Invalid(errors),
        }
    }
}
