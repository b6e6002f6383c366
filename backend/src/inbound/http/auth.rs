//! Authentication API handlers and the bearer-token extractor.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"kim@example.com","password":"secret1","name":"Kim"}
//! POST /api/v1/auth/login {"email":"kim@example.com","password":"secret1"}
//! POST /api/v1/auth/change-password {"currentPassword":"secret1","newPassword":"secret2"}
//! POST /api/v1/auth/forgot-password {"email":"kim@example.com"}
//! POST /api/v1/auth/reset-password {"token":"...","newPassword":"secret3"}
//! ```

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, post, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use super::ApiResult;
use super::extract::ValidJson;
use super::state::HttpState;
use crate::domain::{
    AccessToken, AuthResponse, ChangePasswordRequest, Error, ForgotPasswordRequest, LoginRequest,
    MessageResponse, RegisterRequest, ResetPasswordRequest, User, UserRole,
};

const BEARER_PREFIX: &str = "Bearer ";

/// Reply sent whether or not the email belongs to an account.
pub const FORGOT_PASSWORD_REPLY: &str =
    "If the email is registered, password reset instructions have been sent";

/// The user resolved from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct Authenticated(pub User);

impl Authenticated {
    /// The authenticated user.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Fail with `403` unless the user is an admin.
    ///
    /// # Errors
    /// Returns a forbidden error for non-admin users.
    pub fn require_admin(&self) -> Result<&User, Error> {
        if self.0.role == UserRole::Admin {
            Ok(&self.0)
        } else {
            Err(Error::forbidden("admin role required"))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<AccessToken, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(AccessToken::new)
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let user = state.auth.authenticate(&token).await?;
            debug!(user_id = %user.id, "request authenticated");
            Ok(Self(user))
        })
    }
}

/// Create a customer account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = super::schemas::RegisterRequestSchema,
    responses(
        (status = 201, description = "Account created", body = super::schemas::AuthResponseSchema),
        (status = 400, description = "Validation failed", body = super::schemas::ValidationRejectionSchema),
        (status = 409, description = "Email already registered", body = super::schemas::ErrorSchema),
        (status = 500, description = "Internal server error", body = super::schemas::ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let response = state.auth.register(request).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = super::schemas::LoginRequestSchema,
    responses(
        (status = 200, description = "Login success", body = super::schemas::AuthResponseSchema),
        (status = 400, description = "Validation failed", body = super::schemas::ValidationRejectionSchema),
        (status = 401, description = "Invalid credentials", body = super::schemas::ErrorSchema),
        (status = 403, description = "Account disabled", body = super::schemas::ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let response = state.auth.login(request).await?;
    Ok(web::Json(response))
}

/// Replace the caller's password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    request_body = super::schemas::ChangePasswordRequestSchema,
    responses(
        (status = 200, description = "Password changed", body = super::schemas::MessageResponseSchema),
        (status = 400, description = "Validation failed", body = super::schemas::ValidationRejectionSchema),
        (status = 401, description = "Not authenticated or wrong current password", body = super::schemas::ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "changePassword"
)]
#[post("/auth/change-password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    caller: Authenticated,
    ValidJson(request): ValidJson<ChangePasswordRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    state.auth.change_password(&caller.user().id, request).await?;
    Ok(web::Json(MessageResponse::new("Password changed")))
}

/// Start the password recovery flow.
///
/// The reply is identical for known and unknown emails.
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    request_body = super::schemas::ForgotPasswordRequestSchema,
    responses(
        (status = 200, description = "Request accepted", body = super::schemas::MessageResponseSchema),
        (status = 400, description = "Validation failed", body = super::schemas::ValidationRejectionSchema)
    ),
    tags = ["auth"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/auth/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    ValidJson(request): ValidJson<ForgotPasswordRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    state.auth.forgot_password(request).await?;
    Ok(web::Json(MessageResponse::new(FORGOT_PASSWORD_REPLY)))
}

/// Complete the password recovery flow with a reset token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    request_body = super::schemas::ResetPasswordRequestSchema,
    responses(
        (status = 200, description = "Password reset", body = super::schemas::MessageResponseSchema),
        (status = 400, description = "Validation failed or token rejected", body = super::schemas::ValidationRejectionSchema)
    ),
    tags = ["auth"],
    operation_id = "resetPassword",
    security([])
)]
#[post("/auth/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    ValidJson(request): ValidJson<ResetPasswordRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    state.auth.reset_password(request).await?;
    Ok(web::Json(MessageResponse::new("Password has been reset")))
}
