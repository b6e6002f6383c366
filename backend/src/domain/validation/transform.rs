//! Applies a compiled [`Schema`] to a raw JSON value.

use serde_json::{Map, Value};

use super::schema::json_type_name;
use super::{FieldError, FieldSpec, Schema, ValidationResult};

/// Path reported for failures that concern the whole payload.
pub const ROOT_PATH: &str = "";

/// Validate `raw` against `schema`.
///
/// Fields are visited in declaration order and every broken rule is
/// recorded, so a field can contribute more than one error. Undeclared
/// input fields are ignored and absent from the valid projection; `null` is
/// treated as absent. The function is pure: the same inputs always yield the
/// same result.
///
/// # Examples
/// ```
/// use marketplace_api::domain::validation::{validate, Operation, SchemaRegistry};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::builtin().expect("builtin schemas compile");
/// let schema = registry.schema(Operation::ForgotPassword).expect("registered");
/// let result = validate(schema, &json!({ "email": "a@b.com", "extra": 1 }));
/// assert_eq!(result.into_result().ok(), Some(json!({ "email": "a@b.com" })));
/// ```
pub fn validate(schema: &Schema, raw: &Value) -> ValidationResult {
    let Some(input) = raw.as_object() else {
        return ValidationResult::Invalid(vec![FieldError::type_mismatch(
            ROOT_PATH,
            "object",
            json_type_name(raw),
        )]);
    };

    let mut errors = Vec::new();
    let mut projected = Map::new();
    for field in schema.fields() {
        match input.get(field.name()).filter(|value| !value.is_null()) {
            None => {
                if let Some(message) = field.required_message() {
                    errors.push(FieldError::missing(field.name(), message));
                }
            }
            Some(value) => {
                let before = errors.len();
                check_present(field, value, &mut errors);
                if errors.len() == before {
                    projected.insert(field.name().to_owned(), value.clone());
                }
            }
        }
    }

    if errors.is_empty() {
        ValidationResult::Valid(Value::Object(projected))
    } else {
        ValidationResult::Invalid(errors)
    }
}

fn check_present(field: &FieldSpec, value: &Value, errors: &mut Vec<FieldError>) {
    if !field.kind().accepts(value) {
        errors.push(FieldError::type_mismatch(
            field.name(),
            field.kind().as_str(),
            json_type_name(value),
        ));
        return;
    }
    let Some(text) = value.as_str() else {
        return;
    };
    errors.extend(
        field
            .constraints()
            .iter()
            .filter(|constraint| !constraint.is_satisfied_by(text))
            .map(|constraint| FieldError::constraint(field.name(), constraint.message())),
    );
}
