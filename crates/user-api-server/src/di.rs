//! Dependency injection module using Shaku.

use shaku::{module, HasComponent};
use std::sync::Arc;
use user_api_config::{AppConfig, RedisConfig};
use user_api_core::{UserApiError, UserApiResult, UuidV7Generator};
use user_api_repository::{DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MySqlUserDao, UserRepositoryImpl};
use user_api_service::{
    RedisCacheService, RedisCacheServiceParameters, UserService, UserServiceComponent, UserServiceComponentParameters,
    USER_ENTRY_TTL,
};

// Full stack: MySQL pool, DAO, repository, Redis cache, id generator and
// the user service.
module! {
    pub AppModule {
        components = [
            DatabasePool,
            MySqlUserDao,
            UserRepositoryImpl,
            RedisCacheService,
            UuidV7Generator,
            UserServiceComponent,
        ],
        providers = [],
    }
}

/// Builds the application module from an established pool.
pub fn build_app_module(db_pool: &DatabasePool, config: &AppConfig) -> UserApiResult<Arc<AppModule>> {
    let cache_pool = create_redis_pool(&config.redis)?;

    let module = AppModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.pool_handle(),
        })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters { pool: cache_pool })
        .with_component_parameters::<UserServiceComponent>(user_service_parameters())
        .build();

    Ok(Arc::new(module))
}

/// User service parameters; entries always live for [`USER_ENTRY_TTL`].
fn user_service_parameters() -> UserServiceComponentParameters {
    UserServiceComponentParameters {
        entry_ttl: USER_ENTRY_TTL,
    }
}

/// Creates the Redis pool, or `None` when Redis is disabled.
///
/// deadpool connects lazily, so an unreachable Redis surfaces on first use.
fn create_redis_pool(redis_config: &RedisConfig) -> UserApiResult<Option<Arc<deadpool_redis::Pool>>> {
    if !redis_config.enabled {
        return Ok(None);
    }

    let mut redis_cfg = deadpool_redis::Config::from_url(&redis_config.url);
    redis_cfg.pool = Some(deadpool_redis::PoolConfig::new(redis_config.pool_size));

    let pool = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| UserApiError::Cache(format!("Failed to create Redis pool: {}", e)))?;

    Ok(Some(Arc::new(pool)))
}

/// Resolves the services the HTTP layer needs.
pub trait ServiceResolver {
    /// Resolves the user service.
    fn user_service(&self) -> Arc<dyn UserService>;

    /// Resolves the database pool.
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;
}

impl ServiceResolver for AppModule {
    fn user_service(&self) -> Arc<dyn UserService> {
        self.resolve()
    }

    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}
