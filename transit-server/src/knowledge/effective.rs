//! Per-query effective connection views.
//!
//! An effective view starts from a copy of the base connections, switches
//! off those outside their scheduled hours, then applies each rule in
//! list order. Later rules see the result of earlier ones, so two
//! congestion rules on the same line compound within one query, but
//! nothing carries over to the next query.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::trace;

use crate::domain::{Connection, ConnectionId, Rule, ScheduledRule, StationId};

/// The connection set as it stands for one query time.
#[derive(Debug, Clone)]
pub struct EffectiveConnections {
    at: NaiveDateTime,
    connections: BTreeMap<ConnectionId, Connection>,
    /// Active connection ids by origin, in key order.
    outgoing: BTreeMap<StationId, Vec<ConnectionId>>,
    rules_applied: usize,
}

impl EffectiveConnections {
    pub(crate) fn build(
        mut connections: BTreeMap<ConnectionId, Connection>,
        rules: &[ScheduledRule],
        at: NaiveDateTime,
    ) -> Self {
        apply_schedules(&mut connections, at);

        let mut rules_applied = 0;
        for scheduled in rules {
            if !scheduled.applies_at(at) {
                trace!(rule = %scheduled.rule, "rule outside its window");
                continue;
            }
            apply_rule(&mut connections, &scheduled.rule);
            rules_applied += 1;
        }

        let mut outgoing: BTreeMap<StationId, Vec<ConnectionId>> = BTreeMap::new();
        for connection in connections.values().filter(|c| c.active) {
            outgoing
                .entry(connection.origin().clone())
                .or_default()
                .push(connection.id.clone());
        }

        Self {
            at,
            connections,
            outgoing,
            rules_applied,
        }
    }

    /// The query time this view was built for.
    pub fn at(&self) -> NaiveDateTime {
        self.at
    }

    /// Number of rules whose window was open at the query time.
    pub fn rules_applied(&self) -> usize {
        self.rules_applied
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn is_active(&self, id: &ConnectionId) -> bool {
        self.connections.get(id).is_some_and(|c| c.active)
    }

    /// Active connections leaving `station`, in key order.
    pub fn outgoing(&self, station: &StationId) -> impl Iterator<Item = &Connection> {
        self.outgoing
            .get(station)
            .into_iter()
            .flatten()
            .filter_map(|id| self.connections.get(id))
    }

    /// Every connection, active or not, in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn active_count(&self) -> usize {
        self.outgoing.values().map(Vec::len).sum()
    }

    pub fn into_map(self) -> BTreeMap<ConnectionId, Connection> {
        self.connections
    }
}

fn apply_schedules(connections: &mut BTreeMap<ConnectionId, Connection>, at: NaiveDateTime) {
    for connection in connections.values_mut() {
        if !connection.active {
            continue;
        }
        if let Some(schedule) = &connection.schedule {
            if !schedule.permits(at) {
                connection.active = false;
            }
        }
    }
}

fn apply_rule(connections: &mut BTreeMap<ConnectionId, Connection>, rule: &Rule) {
    match rule {
        Rule::StationClosure { station } => {
            for connection in connections.values_mut() {
                if connection.id.touches(station) {
                    connection.active = false;
                }
            }
        }
        Rule::LineClosure { line } => {
            for connection in connections.values_mut() {
                if connection.line() == line {
                    connection.active = false;
                }
            }
        }
        Rule::SegmentMaintenance {
            origin,
            destination,
        } => {
            for connection in connections.values_mut() {
                if connection.id.joins(origin, destination) {
                    connection.active = false;
                }
            }
        }
        Rule::Congestion { line, factor } => {
            for connection in connections.values_mut() {
                if connection.line() == line {
                    connection.avg_time_mins = factor.apply(connection.avg_time_mins);
                }
            }
        }
    }
}
