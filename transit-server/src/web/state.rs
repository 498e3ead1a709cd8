//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, RouteCache};
use crate::knowledge::KnowledgeStore;
use crate::planner::SearchConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Current knowledge base snapshot and reload control
    pub store: KnowledgeStore,

    /// Route planner configuration
    pub config: Arc<SearchConfig>,

    /// Memoised search results
    pub cache: Arc<RouteCache>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: KnowledgeStore, config: SearchConfig, cache_config: &CacheConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            cache: Arc::new(RouteCache::new(cache_config)),
        }
    }
}
