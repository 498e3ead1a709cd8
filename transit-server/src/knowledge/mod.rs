//! The knowledge base and rule engine.
//!
//! Holds the authoritative stations, connections and rules, loads them
//! from JSON data sets, and produces per-query effective connection views
//! with schedules and operational rules applied.

mod base;
mod effective;
mod error;
mod loader;
mod records;
mod store;

pub use base::KnowledgeBase;
pub use effective::EffectiveConnections;
pub use error::{LoadError, RuleWarning};
pub use loader::{DataSource, fetch, http_client, read_file};
pub use records::{
    ConnectionRecord, DEFAULT_CONGESTION_FACTOR, DayScheduleRecord, StationRecord, TransitData,
};
pub use store::{KnowledgeStore, LoadSummary, Snapshot};
