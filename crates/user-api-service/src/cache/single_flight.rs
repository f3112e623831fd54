//! Per-key request coalescing.
//!
//! Concurrent callers for the same key run one at a time; a caller that
//! re-checks the cache after acquiring the key sees what the previous
//! holder stored, so a burst of misses reaches storage once.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;

type KeyLock = Arc<AsyncMutex<()>>;

/// Registry of per-key async locks.
#[derive(Debug, Default)]
pub struct SingleFlight {
    locks: Mutex<HashMap<String, KeyLock>>,
}

impl SingleFlight {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the lock for `key`.
    pub async fn run<T, F, Fut>(&self, key: &str, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let slot = self.acquire(key);
        let _guard = slot.lock.lock().await;
        f().await
    }

    /// Number of keys that currently have a holder or waiters.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.locks.lock().len()
    }

    fn acquire<'a>(&'a self, key: &'a str) -> Slot<'a> {
        let lock = self
            .locks
            .lock()
            .entry(key.to_string())
            .or_default()
            .clone();
        Slot { owner: self, key, lock }
    }
}

/// Registry reference released on drop, including when the caller's
/// future is cancelled.
struct Slot<'a> {
    owner: &'a SingleFlight,
    key: &'a str,
    lock: KeyLock,
}

impl Drop for Slot<'_> {
    fn drop(&mut self) {
        let mut locks = self.owner.locks.lock();
        // Clones are only taken under the registry lock, so the count is stable here.
        let last_user = locks
            .get(self.key)
            .is_some_and(|current| Arc::ptr_eq(current, &self.lock) && Arc::strong_count(&self.lock) == 2);
        if last_user {
            locks.remove(self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_returns_value_and_cleans_up() {
        let flight = SingleFlight::new();
        let value = flight.run("k", || async { 42 }).await;
        assert_eq!(value, 42);
        assert_eq!(flight.in_flight(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_key_runs_serially() {
        let flight = Arc::new(SingleFlight::new());
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let flight = Arc::clone(&flight);
                let active = Arc::clone(&active);
                let peak = Arc::clone(&peak);
                tokio::spawn(async move {
                    flight
                        .run("k", || async {
                            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                            peak.fetch_max(now, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(5)).await;
                            active.fetch_sub(1, Ordering::SeqCst);
                        })
                        .await;
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(flight.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block_each_other() {
        let flight = SingleFlight::new();

        let (a, b) = tokio::join!(
            flight.run("a", || async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                "a"
            }),
            flight.run("b", || async { "b" }),
        );

        assert_eq!((a, b), ("a", "b"));
        assert_eq!(flight.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_caller_releases_key() {
        let flight = SingleFlight::new();

        let result = tokio::time::timeout(
            Duration::from_millis(5),
            flight.run("k", || std::future::pending::<()>()),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(flight.in_flight(), 0);
    }
}
