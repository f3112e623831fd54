//! `UserDao`: low-level user data access.
//!
//! Implementations talk to exactly one data source. [`UserRepository`]
//! uses one or more of them to fulfil domain-level operations.
//!
//! [`UserRepository`]: crate::traits::UserRepository

use async_trait::async_trait;
use user_api_core::{Interface, User, UserApiResult, UserId};

/// Low-level user data access object.
#[async_trait]
pub trait UserDao: Interface + Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: &UserId) -> UserApiResult<Option<User>>;

    /// Checks whether a row with this ID exists.
    async fn exists(&self, id: &UserId) -> UserApiResult<bool>;

    /// Inserts a new user.
    async fn save(&self, user: &User) -> UserApiResult<User>;

    /// Updates an existing user. Fails with `NotFound` when no row matches.
    async fn update(&self, user: &User) -> UserApiResult<User>;

    /// Deletes a user by ID. Returns `true` if a row was removed.
    async fn delete(&self, id: &UserId) -> UserApiResult<bool>;

    /// Counts all users.
    async fn count(&self) -> UserApiResult<u64>;
}
