//! Request validation core.
//!
//! Every inbound payload is checked against the [`Schema`] registered for its
//! [`Operation`] before business logic sees it:
//!
//! - [`definitions`] holds the static per-operation field tables;
//! - [`SchemaRegistry`] compiles them once at start-up;
//! - [`validate`] applies a schema to a raw JSON value and yields a
//!   [`ValidationResult`];
//! - [`validate_as`] narrows a valid projection into a typed DTO.
//!
//! Client-data failures (missing fields, wrong types, broken rules) never
//! escape as Rust errors; they are collected into
//! [`ValidationResult::Invalid`]. Only [`UnknownOperation`], a server-side
//! defect, is returned as an `Err`.

pub mod definitions;
mod outcome;
mod registry;
mod schema;
mod transform;
mod typed;

pub use outcome::{FieldError, FieldErrorKind, ValidationResult};
pub use registry::{Operation, SchemaRegistry, UnknownOperation};
pub use schema::{
    Constraint, EMAIL_PATTERN, FieldDef, FieldSpec, FieldType, RuleDef, Schema,
    SchemaDefinitionError,
};
pub use transform::{ROOT_PATH, validate};
pub use typed::{ValidatedPayload, validate_as};
