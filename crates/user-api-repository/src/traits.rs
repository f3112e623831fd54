//! Repository trait definitions.

use async_trait::async_trait;
use user_api_core::{Interface, User, UserApiResult, UserId};

/// User repository trait.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: &UserId) -> UserApiResult<Option<User>>;

    /// Checks whether a user with this ID exists.
    async fn exists(&self, id: &UserId) -> UserApiResult<bool>;

    /// Saves a new user.
    async fn save(&self, user: &User) -> UserApiResult<User>;

    /// Updates an existing user.
    async fn update(&self, user: &User) -> UserApiResult<User>;

    /// Deletes a user by ID.
    async fn delete(&self, id: &UserId) -> UserApiResult<bool>;

    /// Counts all users.
    async fn count(&self) -> UserApiResult<u64>;
}
