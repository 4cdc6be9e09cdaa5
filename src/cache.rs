//! Query cache keyed by logical query identity.
//!
//! Two widgets asking for "the same task list" share one cached snapshot
//! and one in-flight fetch. Staleness is declarative per call site: each
//! widget passes its own TTL, and `None` means the entry never goes stale
//! on its own (manual refresh only, via `invalidate_all`).
//!
//! Fetches are read-only, so there is nothing to compensate when a caller
//! goes away mid-fetch — the result is cached for whoever asks next.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::FetchError;

#[derive(Clone)]
struct CacheEntry {
    fetched_at: Instant,
    values: Vec<serde_json::Value>,
}

#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<String, CacheEntry>,
    /// Per-key guards so concurrent misses coalesce into one fetch.
    inflight: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh(&self, key: &str, ttl: Option<Duration>) -> Option<Vec<serde_json::Value>> {
        let entry = self.entries.get(key)?;
        match ttl {
            None => Some(entry.values.clone()),
            Some(ttl) if entry.fetched_at.elapsed() < ttl => Some(entry.values.clone()),
            Some(_) => None,
        }
    }

    /// Serve a fresh snapshot or run `fetch` exactly once for all concurrent
    /// callers of this key. Errors are not cached; the next caller retries.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        fetch: F,
    ) -> Result<Vec<serde_json::Value>, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<serde_json::Value>, FetchError>>,
    {
        if let Some(values) = self.fresh(key, ttl) {
            return Ok(values);
        }

        let guard = self
            .inflight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();
        let _held = guard.lock().await;

        // Another caller may have filled the entry while we waited.
        if let Some(values) = self.fresh(key, ttl) {
            return Ok(values);
        }

        let values = fetch().await?;
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                fetched_at: Instant::now(),
                values: values.clone(),
            },
        );
        Ok(values)
    }

    /// Drop one cached query.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Drop everything. Wired to the dashboard refresh broadcast.
    pub fn invalidate_all(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn rows(n: u64) -> Vec<serde_json::Value> {
        vec![serde_json::json!({ "id": n })]
    }

    #[tokio::test]
    async fn test_fresh_hit_skips_fetch() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let got = cache
                .get_or_fetch("Task|limit=5", Some(Duration::from_secs(60)), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(rows(1))
                })
                .await
                .unwrap();
            assert_eq!(got.len(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_refetches() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..2 {
            cache
                .get_or_fetch("Lead", Some(Duration::ZERO), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(rows(2))
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_none_ttl_never_goes_stale() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..5 {
            cache
                .get_or_fetch("NewsArticle", None, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(rows(3))
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_all_forces_refetch() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let fetch = || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(rows(4)) }
        };
        cache.get_or_fetch("Message", None, fetch).await.unwrap();
        cache.invalidate_all();
        assert!(cache.is_empty());
        cache.get_or_fetch("Message", None, fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_coalesce() {
        let cache = Arc::new(QueryCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let spawn = |cache: Arc<QueryCache>, calls: Arc<AtomicUsize>| {
            tokio::spawn(async move {
                cache
                    .get_or_fetch("Showing", Some(Duration::from_secs(60)), || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(30)).await;
                        Ok(rows(5))
                    })
                    .await
                    .unwrap()
            })
        };

        let a = spawn(cache.clone(), calls.clone());
        let b = spawn(cache.clone(), calls.clone());
        let (ra, rb) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(ra, rb);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        let err = cache
            .get_or_fetch("Campaign", None, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FetchError::Timeout(15))
            })
            .await;
        assert!(err.is_err());

        cache
            .get_or_fetch("Campaign", None, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(rows(6))
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
