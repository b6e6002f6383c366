//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers below mirror the wire shape of each payload and carry the field
//! descriptions and examples shown in the generated document. They are a
//! documentation side-table only; request validation reads the schema
//! registry, never these types.

use utoipa::ToSchema;

/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request cannot be honoured as sent.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Business failure envelope.
#[derive(ToSchema)]
#[schema(as = Error)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "email is already registered")]
    message: String,
    /// Correlation identifier matching the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// One field-level validation failure.
#[derive(ToSchema)]
#[schema(as = FieldError)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct FieldErrorSchema {
    /// Dotted path of the offending field; empty for the payload root.
    #[schema(example = "email")]
    field: String,
    /// Message from the field's rule table.
    #[schema(example = "Invalid email address")]
    message: String,
}

/// Validation failure envelope, always returned with status 400.
#[derive(ToSchema)]
#[schema(as = ValidationRejection)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ValidationRejectionSchema {
    /// Always 400.
    #[schema(example = 400)]
    status_code: u16,
    /// Always `Validation failed`.
    #[schema(example = "Validation failed")]
    message: String,
    /// Failures in schema declaration order.
    errors: Vec<FieldErrorSchema>,
}

/// Marketplace role.
#[derive(ToSchema)]
#[schema(as = UserRole)]
pub enum UserRoleSchema {
    /// Books services.
    #[schema(rename = "customer")]
    Customer,
    /// Offers services.
    #[schema(rename = "provider")]
    Provider,
    /// Manages users.
    #[schema(rename = "admin")]
    Admin,
}

/// Registered user.
#[derive(ToSchema)]
#[schema(as = User)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserSchema {
    /// Stable user identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    /// Unique email, lower-cased.
    #[schema(example = "kim@example.com")]
    email: String,
    /// Display name.
    #[schema(example = "Kim Minsu")]
    name: String,
    /// Contact number.
    #[schema(example = "010-1234-5678")]
    phone: Option<String>,
    /// Marketplace role.
    role: UserRoleSchema,
    /// Inactive users cannot log in.
    is_active: bool,
    /// RFC 3339 creation timestamp.
    #[schema(example = "2026-01-01T09:00:00Z")]
    created_at: String,
    /// RFC 3339 modification timestamp.
    #[schema(example = "2026-01-01T09:00:00Z")]
    updated_at: String,
}

/// One page of users.
#[derive(ToSchema)]
#[schema(as = UserPage)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserPageSchema {
    /// Users on this page, oldest first.
    items: Vec<UserSchema>,
    /// Matching users across all pages.
    total: u64,
    /// One-based page number.
    page: u32,
    /// Page size used.
    limit: u32,
}

/// Successful login or registration.
#[derive(ToSchema)]
#[schema(as = AuthResponse)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct AuthResponseSchema {
    /// Bearer token for the `Authorization` header.
    #[schema(example = "9b1deb4d3b7d4bad9bdd2b0d7b3dcb6d")]
    access_token: String,
    /// Always `Bearer`.
    #[schema(example = "Bearer")]
    token_type: String,
    /// The authenticated user.
    user: UserSchema,
}

/// Plain acknowledgement.
#[derive(ToSchema)]
#[schema(as = MessageResponse)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct MessageResponseSchema {
    /// Human-readable acknowledgement.
    #[schema(example = "Password changed")]
    message: String,
}

/// Body of `POST /auth/login`.
#[derive(ToSchema)]
#[schema(as = LoginRequest)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct LoginRequestSchema {
    /// Account email.
    #[schema(example = "kim@example.com")]
    email: String,
    /// At least 6 characters.
    #[schema(example = "secret1", min_length = 6)]
    password: String,
}

/// Body of `POST /auth/register`.
#[derive(ToSchema)]
#[schema(as = RegisterRequest)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct RegisterRequestSchema {
    /// Account email.
    #[schema(example = "kim@example.com")]
    email: String,
    /// At least 6 characters.
    #[schema(example = "secret1", min_length = 6)]
    password: String,
    /// At least 2 characters.
    #[schema(example = "Kim Minsu", min_length = 2)]
    name: String,
    /// `NN(N)-NNN(N)-NNNN` contact number.
    #[schema(example = "010-1234-5678")]
    phone: Option<String>,
}

/// Body of `POST /auth/change-password`.
#[derive(ToSchema)]
#[schema(as = ChangePasswordRequest)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ChangePasswordRequestSchema {
    /// Password currently on the account.
    #[schema(example = "secret1")]
    current_password: String,
    /// At least 6 characters.
    #[schema(example = "secret2", min_length = 6)]
    new_password: String,
}

/// Body of `POST /auth/forgot-password`.
#[derive(ToSchema)]
#[schema(as = ForgotPasswordRequest)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ForgotPasswordRequestSchema {
    /// Email of the account to recover.
    #[schema(example = "kim@example.com")]
    email: String,
}

/// Body of `POST /auth/reset-password`.
#[derive(ToSchema)]
#[schema(as = ResetPasswordRequest)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ResetPasswordRequestSchema {
    /// Token issued by the forgot-password flow.
    #[schema(example = "5f2b3c9e0d8a4e7f9a1b2c3d4e5f6a7b")]
    token: String,
    /// At least 6 characters.
    #[schema(example = "secret3", min_length = 6)]
    new_password: String,
}

/// Body of `POST /users`.
#[derive(ToSchema)]
#[schema(as = CreateUserRequest)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct CreateUserRequestSchema {
    /// Account email.
    #[schema(example = "lee@example.com")]
    email: String,
    /// At least 6 characters.
    #[schema(example = "secret1", min_length = 6)]
    password: String,
    /// At least 2 characters.
    #[schema(example = "Lee Jiwoo", min_length = 2)]
    name: String,
    /// Contact number.
    #[schema(example = "010-9876-5432")]
    phone: Option<String>,
    /// Defaults to `customer`.
    role: Option<UserRoleSchema>,
    /// Defaults to `true`.
    is_active: Option<bool>,
}

/// Body of `PATCH /users/{id}`; absent fields are left unchanged.
#[derive(ToSchema)]
#[schema(as = UpdateUserRequest)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UpdateUserRequestSchema {
    /// At least 2 characters.
    #[schema(example = "Lee Jiwoo", min_length = 2)]
    name: Option<String>,
    /// Contact number.
    #[schema(example = "010-9876-5432")]
    phone: Option<String>,
    /// Admin only.
    role: Option<UserRoleSchema>,
    /// Admin only.
    is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::PartialSchema;

    use super::*;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    fn wrappers_use_wire_names() {
        assert_eq!(ValidationRejectionSchema::name(), "ValidationRejection");
        assert!(schema_to_json::<ValidationRejectionSchema>().contains("statusCode"));
        assert!(schema_to_json::<ChangePasswordRequestSchema>().contains("currentPassword"));
        assert!(schema_to_json::<UserSchema>().contains("isActive"));
    }
}
