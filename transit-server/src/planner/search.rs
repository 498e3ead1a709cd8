//! Weighted-score route search.
//!
//! A best-first search over `(station, inbound line)` states. Each station
//! keeps the best metrics seen so far; a neighbour is relaxed when the
//! preference score of the new metrics is strictly lower. The queue is
//! ordered by that score plus a straight-line heuristic towards the
//! destination, and stale entries are dropped when popped.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;
use std::time::Instant;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{Coordinates, LineId, Metrics, Preferences, Route, StationId};
use crate::knowledge::{EffectiveConnections, KnowledgeBase, RuleWarning};

use super::config::SearchConfig;
use super::reconstruct::{Predecessor, ReconstructError, reconstruct_route};

/// Error from route search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// Unknown station or otherwise unusable query; no search was attempted
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No network data has been loaded yet
    #[error("no network data loaded")]
    NotLoaded,

    /// Predecessor links were inconsistent
    #[error("route reconstruction failed: {0}")]
    Reconstruction(#[from] ReconstructError),
}

/// A request for a route between two stations.
#[derive(Debug, Clone)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,

    /// When the journey takes place. Defaults to the local time now.
    pub at: Option<NaiveDateTime>,

    /// Scoring preferences. Defaults to [`Preferences::default`].
    pub preferences: Option<Preferences>,
}

impl RouteQuery {
    /// Create a query departing now with default preferences.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            at: None,
            preferences: None,
        }
    }

    pub fn at(mut self, at: NaiveDateTime) -> Self {
        self.at = Some(at);
        self
    }

    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Resolve both endpoints against the knowledge base.
    pub fn validate(&self, base: &KnowledgeBase) -> Result<(StationId, StationId), SearchError> {
        let resolve = |raw: &str, role: &str| -> Result<StationId, SearchError> {
            let id = StationId::parse(raw)
                .map_err(|e| SearchError::InvalidInput(format!("{role}: {e}")))?;
            if !base.contains_station(id.as_str()) {
                return Err(SearchError::InvalidInput(format!(
                    "unknown {role} station '{id}'"
                )));
            }
            Ok(id)
        };

        Ok((
            resolve(&self.origin, "origin")?,
            resolve(&self.destination, "destination")?,
        ))
    }
}

/// How a search ended. None of these are errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Route),
    /// The destination is unreachable with the connections in effect.
    NoRoute,
    /// The search ran past its deadline.
    Cancelled,
}

impl SearchOutcome {
    pub fn route(&self) -> Option<&Route> {
        match self {
            SearchOutcome::Found(route) => Some(route),
            SearchOutcome::NoRoute | SearchOutcome::Cancelled => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOutcome::Found(_) => "found",
            SearchOutcome::NoRoute => "no_route",
            SearchOutcome::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters describing how much work a search did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Stations popped and settled.
    pub settled: usize,
    /// Entries pushed onto the queue, the origin included.
    pub pushed: usize,
}

/// Result of route search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub outcome: SearchOutcome,

    /// Rule entries skipped when the network was loaded.
    pub warnings: Vec<RuleWarning>,

    /// The instant the connections were evaluated at.
    pub at: NaiveDateTime,

    pub stats: SearchStats,
}

/// `f64` with a total order, for use as a heap key.
#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    priority: FloatOrd,
    station: StationId,
    /// Line of the connection that reached `station`; `None` at the origin.
    line: Option<LineId>,
}

impl QueueEntry {
    fn new(priority: f64, station: StationId, line: Option<LineId>) -> Self {
        Self {
            priority: FloatOrd(priority),
            station,
            line,
        }
    }
}

impl Ord for QueueEntry {
    /// Reversed so `BinaryHeap` pops the lowest priority first. Equal
    /// priorities fall back to station id, then line id with `None` first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.station.cmp(&self.station))
            .then_with(|| other.line.cmp(&self.line))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Route planner over a loaded knowledge base.
pub struct Planner<'a> {
    base: &'a KnowledgeBase,
    config: &'a SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(base: &'a KnowledgeBase, config: &'a SearchConfig) -> Self {
        Self { base, config }
    }

    /// Find the best route for a query.
    ///
    /// Unknown stations are an error; an unreachable destination or an
    /// exceeded deadline are reported through [`SearchOutcome`].
    pub fn search(&self, query: &RouteQuery) -> Result<SearchResult, SearchError> {
        let (origin, destination) = query.validate(self.base)?;

        let deadline = self.config.timeout.map(|t| Instant::now() + t);
        let at = query
            .at
            .unwrap_or_else(|| chrono::Local::now().naive_local());
        let default_preferences;
        let preferences = match &query.preferences {
            Some(p) => p,
            None => {
                default_preferences = Preferences::default();
                &default_preferences
            }
        };

        let effective = self.base.effective_connections(at);
        let (outcome, stats) =
            self.find(&effective, &origin, &destination, preferences, deadline)?;

        debug!(
            %origin,
            %destination,
            %at,
            outcome = %outcome,
            settled = stats.settled,
            pushed = stats.pushed,
            rules = effective.rules_applied(),
            "route search finished"
        );

        Ok(SearchResult {
            outcome,
            warnings: self.base.rule_warnings().to_vec(),
            at,
            stats,
        })
    }

    /// Convenience wrapper returning only the outcome.
    pub fn compute_route(
        &self,
        origin: &str,
        destination: &str,
        at: Option<NaiveDateTime>,
        preferences: Option<Preferences>,
    ) -> Result<SearchOutcome, SearchError> {
        let query = RouteQuery {
            origin: origin.to_string(),
            destination: destination.to_string(),
            at,
            preferences,
        };
        Ok(self.search(&query)?.outcome)
    }

    fn find(
        &self,
        effective: &EffectiveConnections,
        origin: &StationId,
        destination: &StationId,
        preferences: &Preferences,
        deadline: Option<Instant>,
    ) -> Result<(SearchOutcome, SearchStats), SearchError> {
        let goal = self.base.station(destination.as_str()).map(|s| s.coordinates);

        let mut stats = SearchStats::default();
        let mut best: HashMap<StationId, Metrics> = HashMap::new();
        let mut predecessors: HashMap<StationId, Predecessor> = HashMap::new();
        let mut settled: HashSet<StationId> = HashSet::new();
        let mut queue = BinaryHeap::new();

        best.insert(origin.clone(), Metrics::ZERO);
        queue.push(QueueEntry::new(0.0, origin.clone(), None));
        stats.pushed += 1;

        while let Some(entry) = queue.pop() {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Ok((SearchOutcome::Cancelled, stats));
            }

            if !settled.insert(entry.station.clone()) {
                continue;
            }
            stats.settled += 1;

            let Some(current) = best.get(&entry.station).copied() else {
                continue;
            };

            if entry.station == *destination {
                let route = reconstruct_route(&predecessors, origin, destination, current)?;
                return Ok((SearchOutcome::Found(route), stats));
            }

            // The recorded link is what reconstruction will follow, so line
            // changes are counted against it.
            let inbound: Option<LineId> = predecessors
                .get(&entry.station)
                .map(|p| p.connection.line.clone());

            for connection in effective.outgoing(&entry.station) {
                let next = connection.destination();
                if settled.contains(next) {
                    continue;
                }

                let line_change = inbound.as_ref().is_some_and(|l| l != connection.line());
                let penalty = if line_change {
                    self.config.transfer_penalty_mins
                } else {
                    0
                };
                let candidate = Metrics {
                    time_mins: current
                        .time_mins
                        .saturating_add(connection.avg_time_mins)
                        .saturating_add(penalty),
                    distance_km: current.distance_km + connection.distance_km,
                    transfers: current.transfers + u32::from(line_change),
                    cost: current.cost.saturating_add(self.config.cost_per_connection),
                };
                let score = preferences.score(&candidate);

                let improves = match best.get(next) {
                    None => true,
                    Some(existing) => score < preferences.score(existing),
                };
                if !improves {
                    continue;
                }

                best.insert(next.clone(), candidate);
                predecessors.insert(
                    next.clone(),
                    Predecessor {
                        station: entry.station.clone(),
                        connection: connection.id.clone(),
                    },
                );

                let priority = score + self.heuristic(next, goal.as_ref());
                queue.push(QueueEntry::new(
                    priority,
                    next.clone(),
                    Some(connection.line().clone()),
                ));
                stats.pushed += 1;
            }
        }

        Ok((SearchOutcome::NoRoute, stats))
    }

    fn heuristic(&self, station: &StationId, goal: Option<&Coordinates>) -> f64 {
        if self.config.heuristic_factor == 0.0 {
            return 0.0;
        }
        match (self.base.station(station.as_str()), goal) {
            (Some(s), Some(goal)) => self.config.heuristic_factor * s.coordinates.euclidean_degrees(goal),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
