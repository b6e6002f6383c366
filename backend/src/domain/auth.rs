//! Authentication request and response DTOs.
//!
//! Request DTOs are only ever produced by
//! [`validate_as`](crate::domain::validation::validate_as), so their string
//! fields already satisfy the rules of the matching schema.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use zeroize::Zeroizing;

use super::User;
use super::validation::{Operation, ValidatedPayload};

/// Caller-supplied secret, wiped from memory on drop and redacted in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap a raw secret.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Expose the secret for hashing or comparison.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl<'de> Deserialize<'de> for Password {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: Password,
}

impl ValidatedPayload for LoginRequest {
    const OPERATION: Operation = Operation::Login;
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Account email, unique across users.
    pub email: String,
    /// Initial password.
    pub password: Password,
    /// Display name.
    pub name: String,
    /// Contact number in `010-1234-5678` form.
    #[serde(default)]
    pub phone: Option<String>,
}

impl ValidatedPayload for RegisterRequest {
    const OPERATION: Operation = Operation::Register;
}

/// Body of `POST /auth/change-password`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Password currently on the account.
    pub current_password: Password,
    /// Replacement password.
    pub new_password: Password,
}

impl ValidatedPayload for ChangePasswordRequest {
    const OPERATION: Operation = Operation::ChangePassword;
}

/// Body of `POST /auth/forgot-password`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    /// Email of the account to recover.
    pub email: String,
}

impl ValidatedPayload for ForgotPasswordRequest {
    const OPERATION: Operation = Operation::ForgotPassword;
}

/// Body of `POST /auth/reset-password`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Single-use token issued by the forgot-password flow.
    pub token: String,
    /// Replacement password.
    pub new_password: Password,
}

impl ValidatedPayload for ResetPasswordRequest {
    const OPERATION: Operation = Operation::ResetPassword;
}

/// Opaque bearer token identifying an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Token as sent in the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Successful login or registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub access_token: AccessToken,
    /// Always `Bearer`.
    pub token_type: String,
    /// The authenticated user.
    pub user: User,
}

impl AuthResponse {
    /// Bearer response for `user`.
    #[must_use]
    pub fn bearer(access_token: AccessToken, user: User) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_owned(),
            user,
        }
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable acknowledgement.
    pub message: String,
}

impl MessageResponse {
    /// Acknowledge with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
