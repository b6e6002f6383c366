//! User management API handlers.
//!
//! ```text
//! POST /api/v1/users {"email":"lee@example.com","password":"secret1","name":"Lee","role":"provider"}
//! PATCH /api/v1/users/{id} {"name":"Lee Jiwoo"}
//! GET /api/v1/users?role=provider&page=1&limit=20
//! GET /api/v1/users/{id}
//! ```
//!
//! Creating and listing users is reserved for admins. Other users may read
//! and update their own record but cannot change role or activation.

use actix_web::{HttpResponse, get, patch, post, web};

use super::ApiResult;
use super::auth::Authenticated;
use super::extract::{ValidJson, ValidQuery};
use super::state::HttpState;
use crate::domain::{CreateUserRequest, Error, UpdateUserRequest, User, UserId, UserPage, UserQuery};

fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(format!("user {raw} not found")))
}

fn ensure_self_or_admin(caller: &Authenticated, id: &UserId) -> Result<(), Error> {
    if caller.user().id == *id {
        return Ok(());
    }
    caller.require_admin().map(|_| ())
}

/// Create a user with an explicit role.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = super::schemas::CreateUserRequestSchema,
    responses(
        (status = 201, description = "User created", body = super::schemas::UserSchema),
        (status = 400, description = "Validation failed", body = super::schemas::ValidationRejectionSchema),
        (status = 401, description = "Not authenticated", body = super::schemas::ErrorSchema),
        (status = 403, description = "Admin role required", body = super::schemas::ErrorSchema),
        (status = 409, description = "Email already registered", body = super::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    ValidJson(request): ValidJson<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    caller.require_admin()?;
    let user = state.users.create_user(request).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Apply a partial update to a user.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = super::schemas::UpdateUserRequestSchema,
    responses(
        (status = 200, description = "Updated user", body = super::schemas::UserSchema),
        (status = 400, description = "Validation failed", body = super::schemas::ValidationRejectionSchema),
        (status = 401, description = "Not authenticated", body = super::schemas::ErrorSchema),
        (status = 403, description = "Not permitted", body = super::schemas::ErrorSchema),
        (status = 404, description = "Unknown user", body = super::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    ValidJson(request): ValidJson<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path)?;
    ensure_self_or_admin(&caller, &id)?;
    if request.role.is_some() || request.is_active.is_some() {
        caller.require_admin()?;
    }
    let user = state.users.update_user(&id, request).await?;
    Ok(web::Json(user))
}

/// Filter and paginate users.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(
        ("search" = Option<String>, Query, description = "Substring of email or name"),
        ("role" = Option<String>, Query, description = "customer, provider or admin"),
        ("isActive" = Option<String>, Query, description = "true or false"),
        ("page" = Option<String>, Query, description = "One-based page number"),
        ("limit" = Option<String>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Matching users", body = super::schemas::UserPageSchema),
        (status = 400, description = "Validation failed", body = super::schemas::ValidationRejectionSchema),
        (status = 401, description = "Not authenticated", body = super::schemas::ErrorSchema),
        (status = 403, description = "Admin role required", body = super::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    caller: Authenticated,
    ValidQuery(query): ValidQuery<UserQuery>,
) -> ApiResult<web::Json<UserPage>> {
    caller.require_admin()?;
    let page = state.users.list_users(&query).await?;
    Ok(web::Json(page))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = super::schemas::UserSchema),
        (status = 401, description = "Not authenticated", body = super::schemas::ErrorSchema),
        (status = 403, description = "Not permitted", body = super::schemas::ErrorSchema),
        (status = 404, description = "Unknown user", body = super::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path)?;
    ensure_self_or_admin(&caller, &id)?;
    let user = state.users.get_user(&id).await?;
    Ok(web::Json(user))
}

#[cfg(test)]
mod tests;
