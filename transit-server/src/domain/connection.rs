//! Directed, line-specific connections between stations.

use std::fmt;

use super::{LineId, Schedule, StationId};

/// Unique key of a connection: `(origin, destination, line)`.
///
/// Ordering is lexicographic over the three parts, which gives the planner
/// a stable iteration order over outgoing connections.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId {
    pub origin: StationId,
    pub destination: StationId,
    pub line: LineId,
}

impl ConnectionId {
    pub fn new(origin: StationId, destination: StationId, line: LineId) -> Self {
        Self {
            origin,
            destination,
            line,
        }
    }

    /// Returns true if this connection joins `a` and `b` in either direction.
    pub fn joins(&self, a: &StationId, b: &StationId) -> bool {
        (&self.origin == a && &self.destination == b)
            || (&self.origin == b && &self.destination == a)
    }

    /// Returns true if either end is `station`.
    pub fn touches(&self, station: &StationId) -> bool {
        &self.origin == station || &self.destination == station
    }
}

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionId({self})")
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.origin, self.destination, self.line)
    }
}

/// A directed edge between two stations on one line.
///
/// Only `active` and `avg_time_mins` ever change, and only on the
/// per-query copies held by an effective view.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    /// Average travel time in minutes.
    pub avg_time_mins: u32,
    /// Track distance in kilometres.
    pub distance_km: f64,
    pub active: bool,
    pub schedule: Option<Schedule>,
}

impl Connection {
    /// Create an active connection without a schedule.
    pub fn new(id: ConnectionId, avg_time_mins: u32, distance_km: f64) -> Self {
        Self {
            id,
            avg_time_mins,
            distance_km,
            active: true,
            schedule: None,
        }
    }

    pub fn origin(&self) -> &StationId {
        &self.id.origin
    }

    pub fn destination(&self) -> &StationId {
        &self.id.destination
    }

    pub fn line(&self) -> &LineId {
        &self.id.line
    }
}
