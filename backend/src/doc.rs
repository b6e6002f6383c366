//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: the auth and user endpoints from the inbound layer
//! - **Schemas**: wrapper types from [`crate::inbound::http::schemas`] that
//!   document payloads without coupling domain types to utoipa
//! - **Security**: bearer token authentication
//!
//! The generated specification is served by Swagger UI when docs are enabled
//! and exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{
    AuthResponseSchema, ChangePasswordRequestSchema, CreateUserRequestSchema, ErrorCodeSchema,
    ErrorSchema, FieldErrorSchema, ForgotPasswordRequestSchema, LoginRequestSchema,
    MessageResponseSchema, RegisterRequestSchema, ResetPasswordRequestSchema,
    UpdateUserRequestSchema, UserPageSchema, UserRoleSchema, UserSchema,
    ValidationRejectionSchema,
};

/// Name of the bearer security scheme.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace API",
        description = "Authentication and user management for the service marketplace. \
            Every request payload is validated against a per-operation schema; failures \
            return a 400 envelope listing each offending field."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::change_password,
        crate::inbound::http::auth::forgot_password,
        crate::inbound::http::auth::reset_password,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        FieldErrorSchema,
        ValidationRejectionSchema,
        UserRoleSchema,
        UserSchema,
        UserPageSchema,
        AuthResponseSchema,
        MessageResponseSchema,
        LoginRequestSchema,
        RegisterRequestSchema,
        ChangePasswordRequestSchema,
        ForgotPasswordRequestSchema,
        ResetPasswordRequestSchema,
        CreateUserRequestSchema,
        UpdateUserRequestSchema,
    )),
    tags(
        (name = "auth", description = "Registration, login and password recovery"),
        (name = "users", description = "User management")
    )
)]
pub struct ApiDoc;
