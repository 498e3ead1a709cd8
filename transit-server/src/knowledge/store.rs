//! Shared, reloadable knowledge base snapshots.
//!
//! Queries take a cheap `Arc` clone of the current knowledge base and
//! release the lock before searching. Reloads build a complete new base
//! without holding the lock and then swap it in, so in-flight queries keep
//! the snapshot they started with.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::base::KnowledgeBase;
use super::error::LoadError;
use super::loader::{DataSource, http_client};

/// A knowledge base together with the generation it was loaded in.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub base: Arc<KnowledgeBase>,
    /// Increments on every successful load; starts at 1.
    pub generation: u64,
}

/// Outcome of a successful (re)load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub generation: u64,
    pub stations: usize,
    pub connections: usize,
    pub rules: usize,
    pub warnings: usize,
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<Snapshot>,
    generation: u64,
}

/// Thread-safe holder of the current knowledge base.
///
/// Starts out unloaded. A failed first load leaves it unloaded; a failed
/// reload leaves the previous snapshot in place.
#[derive(Clone)]
pub struct KnowledgeStore {
    slot: Arc<RwLock<Slot>>,
    reload_lock: Arc<Mutex<()>>,
    source: DataSource,
    http: reqwest::Client,
}

impl KnowledgeStore {
    /// Create an unloaded store for the given source.
    pub fn new(source: DataSource) -> Result<Self, LoadError> {
        Ok(Self {
            slot: Arc::new(RwLock::new(Slot::default())),
            reload_lock: Arc::new(Mutex::new(())),
            source,
            http: http_client()?,
        })
    }

    /// The configured data source.
    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// The current snapshot, or `None` while unloaded.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.slot.read().await.current.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.slot.read().await.current.is_some()
    }

    /// Load the data source again and swap in the result.
    ///
    /// Reloads are serialized; concurrent callers wait their turn.
    pub async fn reload(&self) -> Result<LoadSummary, LoadError> {
        let _guard = self.reload_lock.lock().await;

        let result = match self.source.load(&self.http).await {
            Ok(data) => KnowledgeBase::from_data(data),
            Err(e) => Err(e),
        };

        match result {
            Ok(base) => Ok(self.install(base).await),
            Err(e) => {
                warn!(source = %self.source, error = %e, "load failed, keeping previous data");
                Err(e)
            }
        }
    }

    /// Swap in an already-built knowledge base.
    pub async fn install(&self, base: KnowledgeBase) -> LoadSummary {
        let mut slot = self.slot.write().await;
        slot.generation += 1;
        let summary = LoadSummary {
            generation: slot.generation,
            stations: base.station_count(),
            connections: base.connection_count(),
            rules: base.rules().len(),
            warnings: base.rule_warnings().len(),
        };
        slot.current = Some(Snapshot {
            base: Arc::new(base),
            generation: slot.generation,
        });
        info!(
            generation = summary.generation,
            stations = summary.stations,
            "knowledge base installed"
        );
        summary
    }
}
