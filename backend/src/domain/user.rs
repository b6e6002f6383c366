//! User entity and user-management DTOs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::auth::Password;
use super::validation::{Operation, ValidatedPayload};

/// Default page size for `GET /users`.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page size honoured for `GET /users`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Marketplace role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Books and pays for services.
    #[default]
    Customer,
    /// Offers services.
    Provider,
    /// Manages users.
    Admin,
}

/// Registered user as exposed by the API. Password digests never leave the
/// account store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Unique email, stored lower-cased.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Optional contact number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Marketplace role.
    pub role: UserRole,
    /// Inactive users cannot log in.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Account email, unique across users.
    pub email: String,
    /// Initial password.
    pub password: Password,
    /// Display name.
    pub name: String,
    /// Optional contact number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Role; defaults to [`UserRole::Customer`].
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Activation flag; defaults to `true`.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ValidatedPayload for CreateUserRequest {
    const OPERATION: Operation = Operation::CreateUser;
}

/// Body of `PATCH /users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New contact number.
    #[serde(default)]
    pub phone: Option<String>,
    /// New role.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// New activation flag.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    /// Whether the request changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl ValidatedPayload for UpdateUserRequest {
    const OPERATION: Operation = Operation::UpdateUser;
}

/// Query string of `GET /users`, parsed after schema validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    /// Case-insensitive substring matched against email and name.
    #[serde(default)]
    pub search: Option<String>,
    /// Only users with this role.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Only users with this activation flag.
    #[serde(default, deserialize_with = "parse_optional")]
    pub is_active: Option<bool>,
    /// One-based page number.
    #[serde(default, deserialize_with = "parse_optional")]
    pub page: Option<u32>,
    /// Page size, capped at [`MAX_PAGE_SIZE`].
    #[serde(default, deserialize_with = "parse_optional")]
    pub limit: Option<u32>,
}

impl UserQuery {
    /// Effective one-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Whether `user` passes the filters.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        let search_ok = self.search.as_deref().is_none_or(|needle| {
            let needle = needle.to_lowercase();
            user.email.to_lowercase().contains(&needle)
                || user.name.to_lowercase().contains(&needle)
        });
        search_ok
            && self.role.is_none_or(|role| user.role == role)
            && self.is_active.is_none_or(|active| user.is_active == active)
    }
}

impl ValidatedPayload for UserQuery {
    const OPERATION: Operation = Operation::UserQuery;
}

fn parse_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| raw.parse::<T>().map_err(D::Error::custom))
        .transpose()
}

/// One page of `GET /users` results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    /// Users on this page, oldest first.
    pub items: Vec<User>,
    /// Matching users across all pages.
    pub total: usize,
    /// One-based page number.
    pub page: u32,
    /// Page size used.
    pub limit: u32,
}
