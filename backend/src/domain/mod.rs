//! Domain primitives, request validation and ports.
//!
//! Purpose: define the strongly typed request and response payloads of the
//! marketplace API, the schema-driven validation core that gates every
//! inbound payload, and the ports handlers call once a payload is valid.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - validation: schema registry, validation transform and field errors.
//! - User, UserId, UserRole, UserQuery, UserPage: user management types.
//! - Auth DTOs (`LoginRequest`, `RegisterRequest`, ...) and `AuthResponse`.
//! - ports: `AuthService` and `UserService` driving ports.

pub mod auth;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::auth::{
    AccessToken, AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
    MessageResponse, Password, RegisterRequest, ResetPasswordRequest,
};
pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    CreateUserRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, UpdateUserRequest, User, UserId, UserPage,
    UserQuery, UserRole,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use marketplace_api::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
