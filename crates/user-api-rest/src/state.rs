//! Application state for Axum handlers.

use shaku::{HasComponent, Module};
use std::sync::Arc;
use user_api_repository::DatabasePoolInterface;
use user_api_service::UserService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    /// Database probed by the readiness endpoint; `None` reports ready.
    pub database: Option<Arc<dyn DatabasePoolInterface>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(user_service: Arc<dyn UserService>, database: Option<Arc<dyn DatabasePoolInterface>>) -> Self {
        Self {
            user_service,
            database,
        }
    }

    /// Resolves the state from a Shaku module.
    pub fn from_module<M>(module: &M) -> Self
    where
        M: Module + HasComponent<dyn UserService> + HasComponent<dyn DatabasePoolInterface>,
    {
        let user_service: Arc<dyn UserService> = module.resolve();
        let database: Arc<dyn DatabasePoolInterface> = module.resolve();
        Self::new(user_service, Some(database))
    }
}
