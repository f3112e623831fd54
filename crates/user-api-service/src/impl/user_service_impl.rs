//! User service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface, SingleFlight, USER_ENTRY_TTL};
use crate::dto::{CreateUserRequest, UpdateUserRequest};
use crate::user_service::UserService;
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use user_api_core::{IdGenerator, User, UserApiError, UserApiResult, UserId};
use user_api_repository::UserRepository;
use validator::Validate;

/// User service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceComponent {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    #[shaku(inject)]
    id_generator: Arc<dyn IdGenerator>,
    /// Lifetime of a cached entry.
    entry_ttl: Duration,
    #[shaku(force_default)]
    entry_locks: SingleFlight,
}

impl UserServiceComponent {
    /// Creates a service whose entries live for [`USER_ENTRY_TTL`].
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheInterface>,
        id_generator: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            user_repository,
            cache,
            id_generator,
            entry_ttl: USER_ENTRY_TTL,
            entry_locks: SingleFlight::new(),
        }
    }

    async fn load(&self, id: &UserId) -> UserApiResult<User> {
        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserApiError::not_found("User", id))
    }

    /// Drops the cached entry for `id`.
    ///
    /// Runs under the key lock so an in-flight load cannot write its
    /// pre-mutation value back after the eviction.
    async fn evict(&self, id: &UserId) {
        let key = cache_keys::user_entry(id);
        self.entry_locks
            .run(&key, || async {
                if let Err(e) = self.cache.delete(&key).await {
                    warn!("Failed to evict cache key '{}': {}", key, e);
                }
            })
            .await;
    }
}

#[async_trait]
impl UserService for UserServiceComponent {
    async fn cached_entry(&self, id: &UserId) -> UserApiResult<User> {
        let key = cache_keys::user_entry(id);

        if let Some(cached) = self.cache.get::<User>(&key).await? {
            debug!("Cache hit for user: {}", id);
            return Ok(cached);
        }

        // Re-checked under the key lock; waiters pick up the leader's write.
        self.entry_locks
            .run(&key, || self.cache.get_or_set(&key, self.entry_ttl, || self.load(id)))
            .await
    }

    async fn get_user(&self, id: &UserId) -> UserApiResult<User> {
        debug!("Getting user: {}", id);
        self.load(id).await
    }

    async fn create_user(&self, request: CreateUserRequest) -> UserApiResult<User> {
        request.validate()?;

        let id = self.id_generator.generate();
        debug!("Creating user: {}", id);

        let user = User::new(id, request.name, request.address, request.score);
        let saved_user = self.user_repository.save(&user).await?;

        info!("User created: {}", saved_user.id);
        Ok(saved_user)
    }

    async fn update_user(&self, id: &UserId, request: UpdateUserRequest) -> UserApiResult<User> {
        debug!("Updating user: {}", id);

        request.validate()?;

        let mut user = self.load(id).await?;
        user.apply_changes(request.name, request.address, request.score);

        let updated_user = self.user_repository.update(&user).await?;
        self.evict(id).await;

        info!("User updated: {}", id);
        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> UserApiResult<()> {
        debug!("Deleting user: {}", id);

        let deleted = self.user_repository.delete(id).await?;
        if !deleted {
            return Err(UserApiError::not_found("User", id));
        }

        self.evict(id).await;

        info!("User deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for UserServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceComponent")
            .field("entry_ttl", &self.entry_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCacheService;
    use mockall::mock;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    mock! {
        pub IdGen {}

        impl IdGenerator for IdGen {
            fn generate(&self) -> UserId;
        }
    }

    /// In-memory repository that counts storage reads.
    #[derive(Default)]
    struct CountingUserRepository {
        users: Mutex<HashMap<UserId, User>>,
        reads: AtomicUsize,
        read_delay: Option<Duration>,
    }

    impl CountingUserRepository {
        fn with_user(user: User) -> Self {
            let repo = Self::default();
            repo.put(user);
            repo
        }

        fn slow(mut self, delay: Duration) -> Self {
            self.read_delay = Some(delay);
            self
        }

        /// Writes straight to storage, bypassing the service.
        fn put(&self, user: User) {
            self.users.lock().unwrap().insert(user.id.clone(), user);
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserRepository for CountingUserRepository {
        async fn find_by_id(&self, id: &UserId) -> UserApiResult<Option<User>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.read_delay {
                tokio::time::sleep(delay).await;
            }
            Ok(self.users.lock().unwrap().get(id).cloned())
        }

        async fn exists(&self, id: &UserId) -> UserApiResult<bool> {
            Ok(self.users.lock().unwrap().contains_key(id))
        }

        async fn save(&self, user: &User) -> UserApiResult<User> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(&user.id) {
                return Err(UserApiError::conflict("duplicate id"));
            }
            users.insert(user.id.clone(), user.clone());
            Ok(user.clone())
        }

        async fn update(&self, user: &User) -> UserApiResult<User> {
            let mut users = self.users.lock().unwrap();
            match users.get_mut(&user.id) {
                Some(existing) => {
                    *existing = user.clone();
                    Ok(user.clone())
                }
                None => Err(UserApiError::not_found("User", &user.id)),
            }
        }

        async fn delete(&self, id: &UserId) -> UserApiResult<bool> {
            Ok(self.users.lock().unwrap().remove(id).is_some())
        }

        async fn count(&self) -> UserApiResult<u64> {
            Ok(self.users.lock().unwrap().len() as u64)
        }
    }

    /// Cache whose reads always fail.
    struct BrokenCache;

    #[async_trait]
    impl CacheInterface for BrokenCache {
        async fn get_raw(&self, _key: &str) -> UserApiResult<Option<String>> {
            Err(UserApiError::Cache("connection refused".to_string()))
        }

        async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> UserApiResult<()> {
            Err(UserApiError::Cache("connection refused".to_string()))
        }

        async fn delete(&self, _key: &str) -> UserApiResult<bool> {
            Err(UserApiError::Cache("connection refused".to_string()))
        }

        async fn exists(&self, _key: &str) -> UserApiResult<bool> {
            Err(UserApiError::Cache("connection refused".to_string()))
        }

        fn is_enabled(&self) -> bool {
            true
        }
    }

    /// Cache whose writes fail while reads miss.
    struct ReadOnlyCache;

    #[async_trait]
    impl CacheInterface for ReadOnlyCache {
        async fn get_raw(&self, _key: &str) -> UserApiResult<Option<String>> {
            Ok(None)
        }

        async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> UserApiResult<()> {
            Err(UserApiError::Cache("read only".to_string()))
        }

        async fn delete(&self, _key: &str) -> UserApiResult<bool> {
            Ok(false)
        }

        async fn exists(&self, _key: &str) -> UserApiResult<bool> {
            Ok(false)
        }

        fn is_enabled(&self) -> bool {
            true
        }
    }

    fn alice() -> User {
        User::new(
            UserId::new_unchecked("abc123"),
            Some("Alice".to_string()),
            Some("1 Main St".to_string()),
            Some(10),
        )
    }

    fn unused_id_generator() -> Arc<dyn IdGenerator> {
        let mut id_gen = MockIdGen::new();
        id_gen.expect_generate().never();
        Arc::new(id_gen)
    }

    fn service(
        repo: Arc<CountingUserRepository>,
        cache: Arc<InMemoryCacheService>,
    ) -> UserServiceComponent {
        UserServiceComponent::new(repo, cache, unused_id_generator())
    }

    // =========================================================================
    // cached_entry
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_cached_entry_serves_stale_value_until_ttl_expires() {
        let repo = Arc::new(CountingUserRepository::with_user(alice()));
        let cache = Arc::new(InMemoryCacheService::new());
        let service = service(Arc::clone(&repo), Arc::clone(&cache));
        let id = UserId::new_unchecked("abc123");

        let first = service.cached_entry(&id).await.unwrap();
        assert_eq!(first.score, Some(10));
        assert_eq!(first, repo.find_by_id(&id).await.unwrap().unwrap());

        let mut changed = alice();
        changed.set_score(99);
        repo.put(changed);

        tokio::time::advance(Duration::from_secs(5)).await;
        let within_ttl = service.cached_entry(&id).await.unwrap();
        assert_eq!(within_ttl.score, Some(10));

        tokio::time::advance(Duration::from_secs(16)).await;
        let after_ttl = service.cached_entry(&id).await.unwrap();
        assert_eq!(after_ttl.score, Some(99));
    }

    #[tokio::test]
    async fn test_cached_entry_hit_skips_storage() {
        let repo = Arc::new(CountingUserRepository::with_user(alice()));
        let cache = Arc::new(InMemoryCacheService::new());
        let service = service(Arc::clone(&repo), Arc::clone(&cache));
        let id = UserId::new_unchecked("abc123");

        service.cached_entry(&id).await.unwrap();
        service.cached_entry(&id).await.unwrap();
        service.cached_entry(&id).await.unwrap();

        assert_eq!(repo.reads(), 1);
        assert!(cache.exists("abc123").await.unwrap());
    }

    #[tokio::test]
    async fn test_cached_entry_unknown_id_is_not_found() {
        let repo = Arc::new(CountingUserRepository::default());
        let cache = Arc::new(InMemoryCacheService::new());
        let service = service(Arc::clone(&repo), Arc::clone(&cache));

        let err = service
            .cached_entry(&UserId::new_unchecked("missing"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_cached_entry_not_found_is_not_cached() {
        let repo = Arc::new(CountingUserRepository::default());
        let cache = Arc::new(InMemoryCacheService::new());
        let service = service(Arc::clone(&repo), Arc::clone(&cache));
        let id = UserId::new_unchecked("abc123");

        assert!(service.cached_entry(&id).await.is_err());

        repo.put(alice());
        let found = service.cached_entry(&id).await.unwrap();
        assert_eq!(found.name.as_deref(), Some("Alice"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_load_once() {
        let repo = Arc::new(CountingUserRepository::with_user(alice()).slow(Duration::from_millis(50)));
        let cache = Arc::new(InMemoryCacheService::new());
        let service = Arc::new(service(Arc::clone(&repo), cache));

        let calls = (0..10).map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.cached_entry(&UserId::new_unchecked("abc123")).await })
        });

        for result in futures::future::join_all(calls).await {
            let user = result.unwrap().unwrap();
            assert_eq!(user.score, Some(10));
        }

        assert_eq!(repo.reads(), 1);
        assert_eq!(service.entry_locks.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_cache_read_failure_propagates() {
        let repo = Arc::new(CountingUserRepository::with_user(alice()));
        let service = UserServiceComponent::new(
            Arc::clone(&repo) as Arc<dyn UserRepository>,
            Arc::new(BrokenCache),
            unused_id_generator(),
        );

        let err = service
            .cached_entry(&UserId::new_unchecked("abc123"))
            .await
            .unwrap_err();

        assert!(matches!(err, UserApiError::Cache(_)));
        assert_eq!(repo.reads(), 0);
    }

    #[tokio::test]
    async fn test_cache_write_failure_still_returns_value() {
        let repo = Arc::new(CountingUserRepository::with_user(alice()));
        let service = UserServiceComponent::new(
            Arc::clone(&repo) as Arc<dyn UserRepository>,
            Arc::new(ReadOnlyCache),
            unused_id_generator(),
        );

        let user = service
            .cached_entry(&UserId::new_unchecked("abc123"))
            .await
            .unwrap();

        assert_eq!(user.score, Some(10));
    }

    // =========================================================================
    // Write operations
    // =========================================================================

    #[tokio::test]
    async fn test_create_user_uses_generated_id() {
        let repo = Arc::new(CountingUserRepository::default());
        let mut id_gen = MockIdGen::new();
        id_gen
            .expect_generate()
            .times(1)
            .returning(|| UserId::new_unchecked("generated-1"));
        let service = UserServiceComponent::new(
            Arc::clone(&repo) as Arc<dyn UserRepository>,
            Arc::new(InMemoryCacheService::new()),
            Arc::new(id_gen),
        );

        let user = service
            .create_user(CreateUserRequest {
                name: Some("Bob".to_string()),
                address: None,
                score: Some(3),
            })
            .await
            .unwrap();

        assert_eq!(user.id.as_str(), "generated-1");
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_user_rejects_long_name() {
        let repo = Arc::new(CountingUserRepository::default());
        let service = service(Arc::clone(&repo), Arc::new(InMemoryCacheService::new()));

        let err = service
            .create_user(CreateUserRequest {
                name: Some("x".repeat(256)),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserApiError::Validation(_)));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_user_evicts_cached_entry() {
        let repo = Arc::new(CountingUserRepository::with_user(alice()));
        let cache = Arc::new(InMemoryCacheService::new());
        let service = service(Arc::clone(&repo), Arc::clone(&cache));
        let id = UserId::new_unchecked("abc123");

        service.cached_entry(&id).await.unwrap();

        let updated = service
            .update_user(
                &id,
                UpdateUserRequest {
                    score: Some(Some(99)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("Alice"));
        assert_eq!(updated.score, Some(99));
        assert!(!cache.exists("abc123").await.unwrap());

        let fresh = service.cached_entry(&id).await.unwrap();
        assert_eq!(fresh.score, Some(99));
    }

    #[tokio::test]
    async fn test_update_missing_user_not_found() {
        let service = service(
            Arc::new(CountingUserRepository::default()),
            Arc::new(InMemoryCacheService::new()),
        );

        let err = service
            .update_user(&UserId::new_unchecked("ghost"), UpdateUserRequest::default())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_user_evicts_cached_entry() {
        let repo = Arc::new(CountingUserRepository::with_user(alice()));
        let cache = Arc::new(InMemoryCacheService::new());
        let service = service(Arc::clone(&repo), Arc::clone(&cache));
        let id = UserId::new_unchecked("abc123");

        service.cached_entry(&id).await.unwrap();
        service.delete_user(&id).await.unwrap();

        assert!(!cache.exists("abc123").await.unwrap());
        assert!(service.cached_entry(&id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_user_not_found() {
        let service = service(
            Arc::new(CountingUserRepository::default()),
            Arc::new(InMemoryCacheService::new()),
        );

        let err = service
            .delete_user(&UserId::new_unchecked("ghost"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_user_bypasses_cache() {
        let repo = Arc::new(CountingUserRepository::with_user(alice()));
        let cache = Arc::new(InMemoryCacheService::new());
        let service = service(Arc::clone(&repo), Arc::clone(&cache));
        let id = UserId::new_unchecked("abc123");

        service.get_user(&id).await.unwrap();
        service.get_user(&id).await.unwrap();

        assert_eq!(repo.reads(), 2);
        assert!(cache.is_empty());
    }
}
