//! Declarative field descriptors and their compiled form.
//!
//! Schemas start life as static [`FieldDef`] tables (plain data, no code
//! paths) and are compiled once into a [`Schema`] when the registry is built.
//! Compilation is where regular expressions are built and where rule/type
//! mismatches in the tables are caught.

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use super::Operation;

/// Pattern used by the email-format rule.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Primitive JSON type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A JSON string.
    String,
    /// A JSON boolean.
    Boolean,
    /// Any JSON number.
    Number,
}

impl FieldType {
    /// Name used in type-mismatch messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
        }
    }

    /// Whether `value` carries this type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Number => value.is_number(),
        }
    }
}

/// Name of the JSON type carried by `value`, for diagnostics.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Declarative rule attached to a string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleDef {
    /// At least `min` characters (Unicode scalar values).
    MinLength {
        /// Minimum accepted length.
        min: usize,
        /// Message reported verbatim on failure.
        message: &'static str,
    },
    /// Whole-value match against a regular expression.
    Pattern {
        /// Regular expression source.
        pattern: &'static str,
        /// Message reported verbatim on failure.
        message: &'static str,
    },
    /// Email-format check using [`EMAIL_PATTERN`].
    Email {
        /// Message reported verbatim on failure.
        message: &'static str,
    },
}

/// Static description of one field in a schema.
///
/// # Examples
/// ```
/// use marketplace_api::domain::validation::{FieldDef, RuleDef};
///
/// const EMAIL: FieldDef = FieldDef::string("email")
///     .required("Email is required")
///     .rules(&[RuleDef::Email { message: "Invalid email address" }]);
/// assert_eq!(EMAIL.name(), "email");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    name: &'static str,
    kind: FieldType,
    required: Option<&'static str>,
    rules: &'static [RuleDef],
}

impl FieldDef {
    const fn new(name: &'static str, kind: FieldType) -> Self {
        Self {
            name,
            kind,
            required: None,
            rules: &[],
        }
    }

    /// Optional string field.
    #[must_use]
    pub const fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    /// Optional boolean field.
    #[must_use]
    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    /// Optional numeric field.
    #[must_use]
    pub const fn number(name: &'static str) -> Self {
        Self::new(name, FieldType::Number)
    }

    /// Mark the field as required, reporting `message` when it is absent.
    #[must_use]
    pub const fn required(self, message: &'static str) -> Self {
        Self {
            required: Some(message),
            ..self
        }
    }

    /// Attach the ordered rule list.
    #[must_use]
    pub const fn rules(self, rules: &'static [RuleDef]) -> Self {
        Self { rules, ..self }
    }

    /// Field name as it appears in the payload.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// Defects in a static schema table. These are programming errors surfaced
/// at start-up, never per request.
#[derive(Debug, Error)]
pub enum SchemaDefinitionError {
    /// A pattern rule does not compile.
    #[error("invalid pattern for {operation}.{field}: {source}")]
    InvalidPattern {
        /// Operation owning the field.
        operation: Operation,
        /// Offending field.
        field: &'static str,
        /// Regex compilation failure.
        #[source]
        source: regex::Error,
    },
    /// A string rule was attached to a non-string field.
    #[error("{operation}.{field} is a {kind} field and cannot carry string rules")]
    RuleOnNonString {
        /// Operation owning the field.
        operation: Operation,
        /// Offending field.
        field: &'static str,
        /// Declared field type.
        kind: &'static str,
    },
    /// The same field name appears twice.
    #[error("{operation}.{field} is declared more than once")]
    DuplicateField {
        /// Operation owning the field.
        operation: Operation,
        /// Offending field.
        field: &'static str,
    },
}

#[derive(Debug, Clone)]
enum Check {
    MinLength(usize),
    Matches(Regex),
}

/// Compiled rule with its failure message.
#[derive(Debug, Clone)]
pub struct Constraint {
    check: Check,
    message: &'static str,
}

impl Constraint {
    fn compile(
        operation: Operation,
        field: &'static str,
        rule: RuleDef,
    ) -> Result<Self, SchemaDefinitionError> {
        let compile_pattern = |pattern: &str| {
            Regex::new(pattern).map_err(|source| SchemaDefinitionError::InvalidPattern {
                operation,
                field,
                source,
            })
        };
        Ok(match rule {
            RuleDef::MinLength { min, message } => Self {
                check: Check::MinLength(min),
                message,
            },
            RuleDef::Pattern { pattern, message } => Self {
                check: Check::Matches(compile_pattern(pattern)?),
                message,
            },
            RuleDef::Email { message } => Self {
                check: Check::Matches(compile_pattern(EMAIL_PATTERN)?),
                message,
            },
        })
    }

    /// Whether `value` satisfies the rule.
    #[must_use]
    pub fn is_satisfied_by(&self, value: &str) -> bool {
        match &self.check {
            Check::MinLength(min) => value.chars().count() >= *min,
            Check::Matches(regex) => regex.is_match(value),
        }
    }

    /// Message reported when the rule fails.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// Compiled field descriptor.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: &'static str,
    kind: FieldType,
    required: Option<&'static str>,
    constraints: Vec<Constraint>,
}

impl FieldSpec {
    /// Field name as it appears in the payload.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared primitive type.
    #[must_use]
    pub fn kind(&self) -> FieldType {
        self.kind
    }

    /// Message reported when a required field is absent; `None` when optional.
    #[must_use]
    pub fn required_message(&self) -> Option<&'static str> {
        self.required
    }

    /// Ordered constraints applied once the type matches.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

/// Immutable field rules for one operation.
#[derive(Debug, Clone)]
pub struct Schema {
    operation: Operation,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Compile a static field table.
    ///
    /// # Errors
    /// Returns [`SchemaDefinitionError`] when the table is inconsistent.
    pub fn compile(
        operation: Operation,
        defs: &[FieldDef],
    ) -> Result<Self, SchemaDefinitionError> {
        let mut fields: Vec<FieldSpec> = Vec::with_capacity(defs.len());
        for def in defs {
            if fields.iter().any(|existing| existing.name == def.name) {
                return Err(SchemaDefinitionError::DuplicateField {
                    operation,
                    field: def.name,
                });
            }
            if def.kind != FieldType::String && !def.rules.is_empty() {
                return Err(SchemaDefinitionError::RuleOnNonString {
                    operation,
                    field: def.name,
                    kind: def.kind.as_str(),
                });
            }
            let constraints = def
                .rules
                .iter()
                .map(|rule| Constraint::compile(operation, def.name, *rule))
                .collect::<Result<Vec<_>, _>>()?;
            fields.push(FieldSpec {
                name: def.name,
                kind: def.kind,
                required: def.required,
                constraints,
            });
        }
        Ok(Self { operation, fields })
    }

    /// Operation this schema validates.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(FieldType::String, json!("a"), true)]
    #[case(FieldType::String, json!(1), false)]
    #[case(FieldType::Boolean, json!(false), true)]
    #[case(FieldType::Boolean, json!("false"), false)]
    #[case(FieldType::Number, json!(1.5), true)]
    #[case(FieldType::Number, json!(null), false)]
    fn field_type_accepts(#[case] kind: FieldType, #[case] value: Value, #[case] expected: bool) {
        assert_eq!(kind.accepts(&value), expected);
    }

    #[rstest]
    fn min_length_counts_characters() {
        let constraint = Constraint::compile(
            Operation::Login,
            "password",
            RuleDef::MinLength {
                min: 3,
                message: "short",
            },
        )
        .expect("min length compiles");
        assert!(constraint.is_satisfied_by("äöü"));
        assert!(!constraint.is_satisfied_by("äö"));
    }

    #[rstest]
    #[case("a@b.com", true)]
    #[case("first.last@shop.example.org", true)]
    #[case("not-an-email", false)]
    #[case("a @b.com", false)]
    #[case("a@b", false)]
    fn email_rule(#[case] input: &str, #[case] expected: bool) {
        let constraint = Constraint::compile(
            Operation::Login,
            "email",
            RuleDef::Email { message: "bad" },
        )
        .expect("email pattern compiles");
        assert_eq!(constraint.is_satisfied_by(input), expected);
    }

    #[rstest]
    fn compile_rejects_invalid_pattern() {
        const DEFS: &[FieldDef] = &[FieldDef::string("phone").rules(&[RuleDef::Pattern {
            pattern: "(",
            message: "bad",
        }])];
        let err = Schema::compile(Operation::Register, DEFS).expect_err("pattern is invalid");
        assert!(matches!(
            err,
            SchemaDefinitionError::InvalidPattern { field: "phone", .. }
        ));
    }

    #[rstest]
    fn compile_rejects_string_rules_on_booleans() {
        const DEFS: &[FieldDef] = &[FieldDef::boolean("isActive").rules(&[RuleDef::MinLength {
            min: 1,
            message: "bad",
        }])];
        let err = Schema::compile(Operation::UpdateUser, DEFS).expect_err("rule mismatch");
        assert!(matches!(
            err,
            SchemaDefinitionError::RuleOnNonString {
                field: "isActive",
                kind: "boolean",
                ..
            }
        ));
    }

    #[rstest]
    fn compile_rejects_duplicate_fields() {
        const DEFS: &[FieldDef] = &[FieldDef::string("name"), FieldDef::string("name")];
        let err = Schema::compile(Operation::UpdateUser, DEFS).expect_err("duplicate field");
        assert!(matches!(
            err,
            SchemaDefinitionError::DuplicateField { field: "name", .. }
        ));
    }

    #[rstest]
    fn compile_preserves_declaration_order() {
        const DEFS: &[FieldDef] = &[
            FieldDef::string("b"),
            FieldDef::string("a"),
            FieldDef::boolean("c"),
        ];
        let schema = Schema::compile(Operation::UpdateUser, DEFS).expect("schema compiles");
        let names: Vec<_> = schema.fields().iter().map(FieldSpec::name).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }
}
