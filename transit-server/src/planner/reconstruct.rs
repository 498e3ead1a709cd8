//! Turning the search's predecessor links into a `Route`.

use std::collections::HashMap;

use crate::domain::{ConnectionId, DomainError, Metrics, Route, StationId};

/// How the search last reached a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predecessor {
    pub station: StationId,
    pub connection: ConnectionId,
}

/// The predecessor links don't describe a path. Indicates a planner bug.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconstructError {
    #[error("no predecessor recorded for {0}")]
    MissingPredecessor(StationId),

    #[error("predecessor links loop back through {0}")]
    Cycle(StationId),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Walk predecessor links back from `destination` to `origin`.
///
/// The returned route runs origin to destination and carries `metrics` as
/// its totals.
pub fn reconstruct_route(
    predecessors: &HashMap<StationId, Predecessor>,
    origin: &StationId,
    destination: &StationId,
    metrics: Metrics,
) -> Result<Route, ReconstructError> {
    let mut stations = vec![destination.clone()];
    let mut connections = Vec::new();
    let mut current = destination;

    while current != origin {
        // Every step consumes one link, so more steps than links means a loop.
        if connections.len() > predecessors.len() {
            return Err(ReconstructError::Cycle(current.clone()));
        }
        let link = predecessors
            .get(current)
            .ok_or_else(|| ReconstructError::MissingPredecessor(current.clone()))?;
        connections.push(link.connection.clone());
        stations.push(link.station.clone());
        current = &link.station;
    }

    stations.reverse();
    connections.reverse();
    Ok(Route::new(stations, connections, metrics)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LineId;

    fn sid(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    fn link(from: &str, to: &str, line: &str) -> (StationId, Predecessor) {
        (
            sid(to),
            Predecessor {
                station: sid(from),
                connection: ConnectionId::new(sid(from), sid(to), LineId::parse(line).unwrap()),
            },
        )
    }

    #[test]
    fn walks_back_to_origin() {
        let preds: HashMap<_, _> = [
            link("A", "B", "L1"),
            link("B", "C", "L1"),
            link("C", "D", "L2"),
        ]
        .into_iter()
        .collect();

        let route = reconstruct_route(&preds, &sid("A"), &sid("D"), Metrics::ZERO).unwrap();
        let names: Vec<_> = route.stations().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "D"]);
        assert_eq!(route.hop_count(), 3);
        assert_eq!(route.connections()[2].line.as_str(), "L2");
    }

    #[test]
    fn origin_equals_destination() {
        let route =
            reconstruct_route(&HashMap::new(), &sid("A"), &sid("A"), Metrics::ZERO).unwrap();
        assert_eq!(route.stations(), &[sid("A")]);
        assert!(route.connections().is_empty());
    }

    #[test]
    fn missing_link() {
        let preds: HashMap<_, _> = [link("B", "C", "L1")].into_iter().collect();
        let err = reconstruct_route(&preds, &sid("A"), &sid("C"), Metrics::ZERO).unwrap_err();
        assert_eq!(err, ReconstructError::MissingPredecessor(sid("B")));
    }

    #[test]
    fn cycle_detected() {
        let preds: HashMap<_, _> = [link("C", "B", "L1"), link("B", "C", "L1")]
            .into_iter()
            .collect();
        let err = reconstruct_route(&preds, &sid("A"), &sid("C"), Metrics::ZERO).unwrap_err();
        assert!(matches!(err, ReconstructError::Cycle(_)));
    }
}
