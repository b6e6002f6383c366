//! Driving port for authentication use-cases.

use async_trait::async_trait;

use crate::domain::{
    AccessToken, AuthResponse, ChangePasswordRequest, Error, ForgotPasswordRequest, LoginRequest,
    RegisterRequest, ResetPasswordRequest, User, UserId,
};

/// Single-use token issued by the forgot-password flow and handed to a
/// [`super::ResetNotifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResetToken(String);

impl ResetToken {
    /// Wrap a raw token.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Token as the client will submit it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Domain use-case port for authentication.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and sign it in.
    async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, Error>;

    /// Exchange credentials for an access token.
    async fn login(&self, request: LoginRequest) -> Result<AuthResponse, Error>;

    /// Resolve a bearer token to its user.
    async fn authenticate(&self, token: &AccessToken) -> Result<User, Error>;

    /// Replace the password of `user` after checking the current one.
    async fn change_password(
        &self,
        user: &UserId,
        request: ChangePasswordRequest,
    ) -> Result<(), Error>;

    /// Issue a reset token and deliver it when the email belongs to an
    /// active account. Unknown emails and delivery failures succeed silently
    /// so callers cannot discover which emails are registered.
    async fn forgot_password(&self, request: ForgotPasswordRequest) -> Result<(), Error>;

    /// Consume a reset token and set the new password.
    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), Error>;
}
