//! Route metrics and the immutable `Route` produced by a successful search.

use super::{ConnectionId, DomainError, LineId, StationId};

/// Accumulated cost of a partial or complete route.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    /// Travel time in minutes, transfer penalties included.
    pub time_mins: u32,
    pub distance_km: f64,
    /// Number of line changes.
    pub transfers: u32,
    /// Fare units.
    pub cost: u32,
}

impl Metrics {
    /// The metrics at the origin of a search.
    pub const ZERO: Metrics = Metrics {
        time_mins: 0,
        distance_km: 0.0,
        transfers: 0,
        cost: 0,
    };
}

/// A route from origin to destination.
///
/// # Invariants
///
/// - At least one station
/// - `connections.len() == stations.len() - 1`
/// - Connection `i` runs from station `i` to station `i + 1`
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    stations: Vec<StationId>,
    connections: Vec<ConnectionId>,
    metrics: Metrics,
}

impl Route {
    /// Constructs a route, checking the sequences line up.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::{ConnectionId, LineId, Metrics, Route, StationId};
    ///
    /// let a = StationId::parse("A").unwrap();
    /// let b = StationId::parse("B").unwrap();
    /// let hop = ConnectionId::new(a.clone(), b.clone(), LineId::parse("L1").unwrap());
    ///
    /// let route = Route::new(vec![a, b], vec![hop], Metrics::ZERO).unwrap();
    /// assert_eq!(route.hop_count(), 1);
    /// ```
    pub fn new(
        stations: Vec<StationId>,
        connections: Vec<ConnectionId>,
        metrics: Metrics,
    ) -> Result<Self, DomainError> {
        if stations.is_empty() {
            return Err(DomainError::InvalidRoute(
                "route must contain at least one station",
            ));
        }
        if connections.len() + 1 != stations.len() {
            return Err(DomainError::InvalidRoute(
                "connection count must be one less than station count",
            ));
        }
        for (i, connection) in connections.iter().enumerate() {
            if connection.origin != stations[i] || connection.destination != stations[i + 1] {
                return Err(DomainError::InvalidRoute(
                    "connection does not join consecutive stations",
                ));
            }
        }
        Ok(Self {
            stations,
            connections,
            metrics,
        })
    }

    /// A zero-length route that starts and ends at `station`.
    pub fn stationary(station: StationId) -> Self {
        Self {
            stations: vec![station],
            connections: Vec::new(),
            metrics: Metrics::ZERO,
        }
    }

    pub fn stations(&self) -> &[StationId] {
        &self.stations
    }

    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn origin(&self) -> &StationId {
        &self.stations[0]
    }

    pub fn destination(&self) -> &StationId {
        &self.stations[self.stations.len() - 1]
    }

    pub fn total_time_mins(&self) -> u32 {
        self.metrics.time_mins
    }

    pub fn total_distance_km(&self) -> f64 {
        self.metrics.distance_km
    }

    pub fn transfers(&self) -> u32 {
        self.metrics.transfers
    }

    pub fn cost(&self) -> u32 {
        self.metrics.cost
    }

    /// Number of connections travelled.
    pub fn hop_count(&self) -> usize {
        self.connections.len()
    }

    /// Lines used, in order, with consecutive repeats collapsed.
    pub fn lines(&self) -> Vec<&LineId> {
        let mut lines: Vec<&LineId> = Vec::new();
        for connection in &self.connections {
            if lines.last() != Some(&&connection.line) {
                lines.push(&connection.line);
            }
        }
        lines
    }
}
