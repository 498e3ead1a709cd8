//! Caching layer for route search results.
//!
//! Results are keyed by the knowledge base generation, so a reload makes
//! every older entry unreachable; the store's owner also clears the cache
//! on reload to free memory early. Query times are truncated to the minute,
//! which bounds cardinality and matches the minute resolution of schedules
//! and rule windows.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, Timelike};
use moka::future::Cache as MokaCache;

use crate::domain::Preferences;
use crate::planner::{SearchOutcome, SearchResult};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Truncate a query time to the start of its minute.
pub fn query_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

/// Cache key: (generation, origin, destination, query minute, preferences).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    generation: u64,
    origin: String,
    destination: String,
    minute: NaiveDateTime,
    preferences: String,
}

impl RouteKey {
    pub fn new(
        generation: u64,
        origin: &str,
        destination: &str,
        at: NaiveDateTime,
        preferences: &Preferences,
    ) -> Self {
        Self {
            generation,
            origin: origin.trim().to_string(),
            destination: destination.trim().to_string(),
            minute: query_minute(at),
            preferences: preferences.cache_key(),
        }
    }
}

/// Cache for route search results.
pub struct RouteCache {
    routes: MokaCache<RouteKey, Arc<SearchResult>>,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { routes }
    }

    /// Get a cached result.
    pub async fn get(&self, key: &RouteKey) -> Option<Arc<SearchResult>> {
        self.routes.get(key).await
    }

    /// Insert a result. Cancelled searches are not cached, since a retry
    /// may well finish. Returns whether the entry was stored.
    pub async fn insert(&self, key: RouteKey, result: Arc<SearchResult>) -> bool {
        if matches!(result.outcome, SearchOutcome::Cancelled) {
            return false;
        }
        self.routes.insert(key, result).await;
        true
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
    }
}
