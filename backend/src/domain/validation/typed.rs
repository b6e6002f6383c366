//! Narrowing a validated projection into a request DTO.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use super::transform::ROOT_PATH;
use super::{
    FieldError, FieldErrorKind, Operation, SchemaRegistry, UnknownOperation, ValidationResult,
    validate,
};

/// A request DTO bound to the schema that guards it.
pub trait ValidatedPayload: DeserializeOwned {
    /// Operation whose schema must accept the raw payload first.
    const OPERATION: Operation;
}

/// Validate `raw` against `T`'s schema and, on success, deserialise the
/// projection into `T`.
///
/// A projection that passes the schema but does not fit `T` means the table
/// and the DTO disagree; it is logged and reported as a single root-level
/// failure so the client still receives a well-formed rejection.
///
/// # Errors
/// Returns [`UnknownOperation`] when `registry` has no schema for
/// `T::OPERATION`.
pub fn validate_as<T: ValidatedPayload>(
    registry: &SchemaRegistry,
    raw: &Value,
) -> Result<ValidationResult<T>, UnknownOperation> {
    let schema = registry.schema(T::OPERATION)?;
    Ok(match validate(schema, raw) {
        ValidationResult::Invalid(errors) => ValidationResult::Invalid(errors),
        ValidationResult::Valid(projected) => match serde_json::from_value::<T>(projected) {
            Ok(payload) => ValidationResult::Valid(payload),
            Err(err) => {
                error!(
                    operation = %T::OPERATION,
                    error = %err,
                    "validated payload does not fit its DTO"
                );
                ValidationResult::Invalid(vec![FieldError::new(
                    ROOT_PATH,
                    "Request payload could not be interpreted",
                    FieldErrorKind::TypeMismatch,
                )])
            }
        },
    })
}
