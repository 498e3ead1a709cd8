//! Route planner using a weighted-score best-first search.
//!
//! This module answers: "what is the best way from station A to station B
//! at this time, given how much I care about time, distance, changes and
//! fare?"
//!
//! Each query evaluates schedules and operational rules into its own
//! effective connection set, searches it, and rebuilds the winning path
//! from predecessor links.

mod config;
mod reconstruct;
mod search;

pub use config::SearchConfig;
pub use reconstruct::{Predecessor, ReconstructError, reconstruct_route};
pub use search::{
    Planner, RouteQuery, SearchError, SearchOutcome, SearchResult, SearchStats,
};
