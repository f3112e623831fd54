//! Caching infrastructure for the service layer.
//!
//! A cache abstraction backed by Redis, plus the per-key coalescing used to
//! keep concurrent misses off storage. An in-memory backend for tests is
//! available behind the `test-util` feature.

mod cache_interface;
pub mod cache_keys;
#[cfg(any(test, feature = "test-util"))]
mod memory_cache;
mod redis_cache;
mod single_flight;

pub use cache_interface::{CacheExt, CacheInterface};
pub use cache_keys::USER_ENTRY_TTL;
#[cfg(any(test, feature = "test-util"))]
pub use memory_cache::InMemoryCacheService;
pub use redis_cache::{RedisCacheService, RedisCacheServiceParameters};
pub use single_flight::SingleFlight;
