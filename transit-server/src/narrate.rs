//! Plain-text route descriptions.

use std::fmt;

use crate::domain::{Route, StationId};
use crate::knowledge::KnowledgeBase;

/// Shown when a search found nothing.
pub const NO_ROUTE_MESSAGE: &str = "No valid route found.";

/// One step of a route description. Stations are given by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Depart {
        station: String,
        line: String,
        toward: String,
    },
    Continue {
        line: String,
        to: String,
    },
    Transfer {
        station: String,
        line: String,
    },
    Arrive {
        station: String,
    },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Depart {
                station,
                line,
                toward,
            } => write!(f, "Start at {station}. Take line {line} toward {toward}."),
            Instruction::Continue { line, to } => write!(f, "Continue on line {line} to {to}."),
            Instruction::Transfer { station, line } => {
                write!(f, "At {station}, transfer to line {line}.")
            }
            Instruction::Arrive { station } => write!(f, "Arrive at your destination: {station}."),
        }
    }
}

fn display_name(base: &KnowledgeBase, id: &StationId) -> String {
    base.station(id.as_str())
        .map(|s| s.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Turn a route into ordered instructions.
///
/// The first hop departs, every later hop continues on its line, a change
/// of line inserts a transfer, and the walk always ends with an arrival.
/// A zero-length route is just the arrival.
pub fn narrate(base: &KnowledgeBase, route: &Route) -> Vec<Instruction> {
    let stations = route.stations();
    let last_hop = route.hop_count().saturating_sub(1);
    let mut steps = Vec::new();

    for (i, hop) in route.connections().iter().enumerate() {
        let from = display_name(base, &stations[i]);
        let to = display_name(base, &stations[i + 1]);
        let line = hop.line.to_string();

        if i == 0 {
            steps.push(Instruction::Depart {
                station: from,
                line,
                toward: to,
            });
            continue;
        }

        if route.connections()[i - 1].line != hop.line {
            steps.push(Instruction::Transfer {
                station: from,
                line: line.clone(),
            });
        }
        if i < last_hop {
            steps.push(Instruction::Continue { line, to });
        }
    }

    steps.push(Instruction::Arrive {
        station: display_name(base, route.destination()),
    });
    steps
}

/// The summary lines shown above the instructions.
pub fn summary(route: &Route) -> Vec<String> {
    vec![
        format!("Route with {} stations:", route.stations().len()),
        format!("- Total time: {} minutes", route.total_time_mins()),
        format!("- Total distance: {:.2} km", route.total_distance_km()),
        format!("- Transfers: {}", route.transfers()),
        format!("- Cost: {} units", route.cost()),
    ]
}

/// Full text description of a route, or [`NO_ROUTE_MESSAGE`].
pub fn describe_route(base: &KnowledgeBase, route: Option<&Route>) -> String {
    let Some(route) = route else {
        return NO_ROUTE_MESSAGE.to_string();
    };

    let mut lines = summary(route);
    lines.push(String::new());
    lines.push("Step-by-step instructions:".to_string());
    for (i, step) in narrate(base, route).iter().enumerate() {
        lines.push(format!("{}. {step}", i + 1));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, LineId, Metrics};
    use crate::knowledge::TransitData;
    use serde_json::json;

    fn base() -> KnowledgeBase {
        let data: TransitData = serde_json::from_value(json!({
            "stations": [
                {"id": "A", "name": "Alpha", "latitude": 0.0, "longitude": 0.0},
                {"id": "B", "name": "Beta", "latitude": 0.0, "longitude": 0.01},
                {"id": "C", "name": "Gamma", "latitude": 0.0, "longitude": 0.02},
                {"id": "D", "name": "Delta", "latitude": 0.0, "longitude": 0.03},
            ],
        }))
        .unwrap();
        KnowledgeBase::from_data(data).unwrap()
    }

    fn sid(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    fn route(path: &[&str], lines: &[&str], metrics: Metrics) -> Route {
        let stations: Vec<_> = path.iter().map(|s| sid(s)).collect();
        let hops = stations
            .windows(2)
            .zip(lines)
            .map(|(w, l)| ConnectionId::new(w[0].clone(), w[1].clone(), LineId::parse(l).unwrap()))
            .collect();
        Route::new(stations, hops, metrics).unwrap()
    }

    #[test]
    fn transfer_and_continue() {
        let r = route(&["A", "B", "C", "D"], &["L1", "L2", "L2"], Metrics::ZERO);
        let steps: Vec<String> = narrate(&base(), &r).iter().map(|s| s.to_string()).collect();

        assert_eq!(
            steps,
            [
                "Start at Alpha. Take line L1 toward Beta.",
                "At Beta, transfer to line L2.",
                "Continue on line L2 to Gamma.",
                "Arrive at your destination: Delta.",
            ]
        );
    }

    #[test]
    fn single_hop() {
        let r = route(&["A", "B"], &["L1"], Metrics::ZERO);
        assert_eq!(
            narrate(&base(), &r),
            [
                Instruction::Depart {
                    station: "Alpha".into(),
                    line: "L1".into(),
                    toward: "Beta".into(),
                },
                Instruction::Arrive {
                    station: "Beta".into()
                },
            ]
        );
    }

    #[test]
    fn zero_length_route_only_arrives() {
        let r = Route::stationary(sid("C"));
        assert_eq!(
            narrate(&base(), &r),
            [Instruction::Arrive {
                station: "Gamma".into()
            }]
        );
    }

    #[test]
    fn describe_includes_summary() {
        let metrics = Metrics {
            time_mins: 16,
            distance_km: 2.0,
            transfers: 1,
            cost: 20,
        };
        let r = route(&["A", "B", "C"], &["L1", "L2"], metrics);

        let text = describe_route(&base(), Some(&r));
        assert_eq!(
            text,
            "Route with 3 stations:\n\
             - Total time: 16 minutes\n\
             - Total distance: 2.00 km\n\
             - Transfers: 1\n\
             - Cost: 20 units\n\
             \n\
             Step-by-step instructions:\n\
             1. Start at Alpha. Take line L1 toward Beta.\n\
             2. At Beta, transfer to line L2.\n\
             3. Arrive at your destination: Gamma."
        );
    }

    #[test]
    fn describe_without_route() {
        assert_eq!(describe_route(&base(), None), NO_ROUTE_MESSAGE);
    }
}
