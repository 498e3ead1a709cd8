//! The knowledge base: authoritative stations, connections and rules.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::domain::{Connection, ConnectionId, ScheduledRule, Station, StationId};

use super::effective::EffectiveConnections;
use super::error::{LoadError, RuleWarning};
use super::records::{TransitData, parse_rule};

/// Read-only network data shared by every query.
///
/// The base collections never change after construction. Each query asks
/// for an [`EffectiveConnections`] snapshot, which owns its own copies of
/// the connections, so concurrent queries need no locking.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    stations: HashMap<StationId, Station>,
    connections: BTreeMap<ConnectionId, Connection>,
    rules: Vec<ScheduledRule>,
    rule_warnings: Vec<RuleWarning>,
}

impl KnowledgeBase {
    /// Build a knowledge base from validated parts.
    ///
    /// # Errors
    ///
    /// Returns `Err` if there are no stations, if ids repeat, or if a
    /// connection refers to a station that isn't present.
    pub fn new(
        stations: Vec<Station>,
        connections: Vec<Connection>,
        rules: Vec<ScheduledRule>,
    ) -> Result<Self, LoadError> {
        if stations.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut by_id = HashMap::with_capacity(stations.len());
        for station in stations {
            if by_id.contains_key(&station.id) {
                return Err(LoadError::DuplicateStation(station.id));
            }
            by_id.insert(station.id.clone(), station);
        }

        let mut by_key = BTreeMap::new();
        for connection in connections {
            for end in [connection.origin(), connection.destination()] {
                if !by_id.contains_key(end) {
                    return Err(LoadError::UnknownStation {
                        connection: connection.id.to_string(),
                        station: end.to_string(),
                    });
                }
            }
            if by_key.contains_key(&connection.id) {
                return Err(LoadError::DuplicateConnection(connection.id));
            }
            by_key.insert(connection.id.clone(), connection);
        }

        Ok(Self {
            stations: by_id,
            connections: by_key,
            rules,
            rule_warnings: Vec::new(),
        })
    }

    /// Build a knowledge base from a parsed data set.
    ///
    /// Station and connection problems abort the load. Rule entries that
    /// can't be understood are skipped and kept as warnings.
    pub fn from_data(data: TransitData) -> Result<Self, LoadError> {
        let stations = data
            .stations
            .iter()
            .map(|r| r.to_station())
            .collect::<Result<Vec<_>, _>>()?;
        let connections = data
            .connections
            .iter()
            .map(|r| r.to_connection())
            .collect::<Result<Vec<_>, _>>()?;

        let mut base = Self::new(stations, connections, Vec::new())?;

        for (index, value) in data.rules.iter().enumerate() {
            match parse_rule(index, value, &base.stations) {
                Ok(rule) => base.rules.push(rule),
                Err(warning) => {
                    warn!(%warning, "skipping rule");
                    base.rule_warnings.push(warning);
                }
            }
        }

        info!(
            stations = base.stations.len(),
            connections = base.connections.len(),
            rules = base.rules.len(),
            warnings = base.rule_warnings.len(),
            "knowledge base loaded"
        );

        Ok(base)
    }

    /// Look up a station by id.
    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn contains_station(&self, id: &str) -> bool {
        self.stations.contains_key(id)
    }

    /// All stations, ordered by id.
    pub fn stations(&self) -> Vec<&Station> {
        let mut stations: Vec<&Station> = self.stations.values().collect();
        stations.sort_by(|a, b| a.id.cmp(&b.id));
        stations
    }

    /// Base (rule-free) connection by key.
    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    /// Base connections in key order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn rules(&self) -> &[ScheduledRule] {
        &self.rules
    }

    /// Rule entries skipped during load.
    pub fn rule_warnings(&self) -> &[RuleWarning] {
        &self.rule_warnings
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// A fresh copy of the connections with schedules and rules applied
    /// for `at`. The base data is left untouched.
    pub fn effective_connections(&self, at: NaiveDateTime) -> EffectiveConnections {
        EffectiveConnections::build(self.connections.clone(), &self.rules, at)
    }
}
