//! `UserRepositoryImpl` implements [`UserRepository`] on top of a [`UserDao`].
//!
//! [`UserRepository`]: crate::traits::UserRepository
//! [`UserDao`]: crate::dao::UserDao

use crate::{dao::UserDao, traits::UserRepository};
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::debug;
use user_api_core::{User, UserApiError, UserApiResult, UserId};
use validator::Validate;

/// Repository implementation that validates entities and delegates
/// storage to a [`UserDao`].
#[derive(Component)]
#[shaku(interface = UserRepository)]
pub struct UserRepositoryImpl {
    /// Primary data access object.
    #[shaku(inject)]
    user_dao: Arc<dyn UserDao>,
}

impl UserRepositoryImpl {
    /// Creates a new `UserRepositoryImpl` with the given DAO.
    #[must_use]
    pub fn new(user_dao: Arc<dyn UserDao>) -> Self {
        Self { user_dao }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_by_id(&self, id: &UserId) -> UserApiResult<Option<User>> {
        debug!("Repository: find_by_id {}", id);
        self.user_dao.find_by_id(id).await
    }

    async fn exists(&self, id: &UserId) -> UserApiResult<bool> {
        self.user_dao.exists(id).await
    }

    async fn save(&self, user: &User) -> UserApiResult<User> {
        debug!("Repository: save user {}", user.id);
        user.validate()?;
        if self.user_dao.exists(&user.id).await? {
            return Err(UserApiError::conflict(format!("User '{}' already exists", user.id)));
        }
        self.user_dao.save(user).await
    }

    async fn update(&self, user: &User) -> UserApiResult<User> {
        debug!("Repository: update user {}", user.id);
        user.validate()?;
        self.user_dao.update(user).await
    }

    async fn delete(&self, id: &UserId) -> UserApiResult<bool> {
        debug!("Repository: delete user {}", id);
        self.user_dao.delete(id).await
    }

    async fn count(&self) -> UserApiResult<u64> {
        self.user_dao.count().await
    }
}

impl std::fmt::Debug for UserRepositoryImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRepositoryImpl").finish_non_exhaustive()
    }
}
