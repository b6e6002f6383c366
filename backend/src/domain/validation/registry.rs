//! Operation identifiers and the registry holding one schema per operation.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::definitions;
use super::{Schema, SchemaDefinitionError};

/// Request operations that carry a validated payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `POST /auth/login`.
    Login,
    /// `POST /auth/register`.
    Register,
    /// `POST /auth/change-password`.
    ChangePassword,
    /// `POST /auth/forgot-password`.
    ForgotPassword,
    /// `POST /auth/reset-password`.
    ResetPassword,
    /// `POST /users`.
    CreateUser,
    /// `PATCH /users/{id}`.
    UpdateUser,
    /// `GET /users` query string.
    UserQuery,
}

impl Operation {
    /// Every operation, in a stable order.
    pub const ALL: [Self; 8] = [
        Self::Login,
        Self::Register,
        Self::ChangePassword,
        Self::ForgotPassword,
        Self::ResetPassword,
        Self::CreateUser,
        Self::UpdateUser,
        Self::UserQuery,
    ];

    /// Stable wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::ChangePassword => "change_password",
            Self::ForgotPassword => "forgot_password",
            Self::ResetPassword => "reset_password",
            Self::CreateUser => "create_user",
            Self::UpdateUser => "update_user",
            Self::UserQuery => "user_query",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|operation| operation.as_str() == s)
            .ok_or_else(|| UnknownOperation::new(s))
    }
}

/// A schema was requested for an operation nobody registered.
///
/// This is a server-side defect: adapters map it to an internal error, never
/// to a client validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no schema registered for operation `{name}`")]
pub struct UnknownOperation {
    name: String,
}

impl UnknownOperation {
    /// Build the error for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Name that failed to resolve.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Read-only map from operation to compiled schema.
///
/// Built once at start-up and shared by reference afterwards; lookups never
/// mutate it, so concurrent requests need no coordination.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<Operation, Schema>,
}

impl SchemaRegistry {
    /// Compile the built-in schema for every [`Operation`].
    ///
    /// # Errors
    /// Returns [`SchemaDefinitionError`] if a built-in table is inconsistent.
    pub fn builtin() -> Result<Self, SchemaDefinitionError> {
        Operation::ALL
            .into_iter()
            .map(|operation| Schema::compile(operation, definitions::fields_for(operation)))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::from_schemas)
    }

    /// Assemble a registry from already compiled schemas. Later schemas for
    /// the same operation replace earlier ones.
    pub fn from_schemas(schemas: impl IntoIterator<Item = Schema>) -> Self {
        Self {
            schemas: schemas
                .into_iter()
                .map(|schema| (schema.operation(), schema))
                .collect(),
        }
    }

    /// Schema registered for `operation`.
    ///
    /// # Errors
    /// Returns [`UnknownOperation`] when nothing is registered.
    pub fn schema(&self, operation: Operation) -> Result<&Schema, UnknownOperation> {
        self.schemas
            .get(&operation)
            .ok_or_else(|| UnknownOperation::new(operation.as_str()))
    }

    /// Schema registered under the wire name `name`.
    ///
    /// # Errors
    /// Returns [`UnknownOperation`] when the name is not an operation or has
    /// no schema.
    ///
    /// # Examples
    /// ```
    /// use marketplace_api::domain::validation::SchemaRegistry;
    ///
    /// let registry = SchemaRegistry::builtin().expect("builtin schemas compile");
    /// assert!(registry.get_schema("login").is_ok());
    /// assert!(registry.get_schema("checkout").is_err());
    /// ```
    pub fn get_schema(&self, name: &str) -> Result<&Schema, UnknownOperation> {
        self.schema(name.parse()?)
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no schema is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Confirm every operation has a schema. Run at start-up so request-time
    /// lookups cannot fail.
    ///
    /// # Errors
    /// Returns [`UnknownOperation`] for the first operation without a schema.
    pub fn ensure_complete(&self) -> Result<(), UnknownOperation> {
        Operation::ALL
            .into_iter()
            .try_for_each(|operation| self.schema(operation).map(|_| ()))
    }
}
