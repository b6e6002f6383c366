//! Driving port for user management.

use async_trait::async_trait;

use crate::domain::{
    CreateUserRequest, Error, UpdateUserRequest, User, UserId, UserPage, UserQuery,
};

/// Domain use-case port for creating, updating and listing users.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user; fails with a conflict when the email is taken.
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error>;

    /// Apply a partial update; fails with not-found for unknown ids.
    async fn update_user(&self, id: &UserId, request: UpdateUserRequest) -> Result<User, Error>;

    /// Fetch one user.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;

    /// Filter and paginate users.
    async fn list_users(&self, query: &UserQuery) -> Result<UserPage, Error>;
}
