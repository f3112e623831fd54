//! User service trait definition.

use crate::dto::{CreateUserRequest, UpdateUserRequest};
use async_trait::async_trait;
use user_api_core::{Interface, User, UserApiResult, UserId};

/// User service trait.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Looks up a user through the entry cache.
    ///
    /// A hit is served without touching storage. A miss loads the user and
    /// caches it for [`USER_ENTRY_TTL`](crate::cache::USER_ENTRY_TTL);
    /// concurrent misses for the same id share one load. An unknown id
    /// yields `NotFound` and caches nothing.
    async fn cached_entry(&self, id: &UserId) -> UserApiResult<User>;

    /// Reads a user straight from storage.
    async fn get_user(&self, id: &UserId) -> UserApiResult<User>;

    /// Creates a new user with a generated id.
    async fn create_user(&self, request: CreateUserRequest) -> UserApiResult<User>;

    /// Applies a partial update and evicts the cached entry.
    async fn update_user(&self, id: &UserId, request: UpdateUserRequest) -> UserApiResult<User>;

    /// Deletes a user and evicts the cached entry.
    async fn delete_user(&self, id: &UserId) -> UserApiResult<()>;
}
