//! Data transfer objects for web requests and responses.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Preferences, Route, Station};
use crate::knowledge::{KnowledgeBase, LoadSummary, RuleWarning};
use crate::narrate::{NO_ROUTE_MESSAGE, describe_route};
use crate::planner::{SearchOutcome, SearchResult, SearchStats};

/// Narration used when the search ran out of time.
pub const CANCELLED_MESSAGE: &str = "Search timed out before a route was found.";

/// Request to plan a route.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// Origin station id
    #[serde(alias = "origen")]
    pub origin: String,

    /// Destination station id
    #[serde(alias = "destino")]
    pub destination: String,

    /// Journey time, e.g. "2024-03-18T08:00:00" (defaults to now)
    #[serde(default, alias = "hora")]
    pub at: Option<NaiveDateTime>,

    /// Scoring preferences (defaults apply when absent)
    #[serde(default, alias = "preferencias")]
    pub preferences: Option<Vec<PreferenceDto>>,
}

impl RouteRequest {
    /// Convert the requested preferences, skipping unknown names.
    pub fn preferences(&self) -> Result<Option<Preferences>, DomainError> {
        self.preferences
            .as_ref()
            .map(|prefs| Preferences::from_named(prefs.iter().map(|p| (p.name.as_str(), p.weight))))
            .transpose()
    }
}

/// One weighted criterion, e.g. `{"name": "time", "weight": 0.7}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceDto {
    #[serde(alias = "nombre")]
    pub name: String,

    #[serde(alias = "peso")]
    pub weight: f64,
}

/// A station on a route.
#[derive(Debug, Serialize)]
pub struct StopDto {
    pub id: String,
    pub name: String,
}

/// One connection travelled.
#[derive(Debug, Serialize)]
pub struct HopDto {
    pub origin: String,
    pub destination: String,
    pub line: String,

    /// Scheduled headway on the day of travel, when known
    pub frequency_mins: Option<u32>,
}

/// A found route.
#[derive(Debug, Serialize)]
pub struct RouteDto {
    pub stations: Vec<StopDto>,
    pub connections: Vec<HopDto>,
    pub lines: Vec<String>,
    pub total_time_mins: u32,
    pub total_distance_km: f64,
    pub transfers: u32,
    pub cost: u32,
}

impl RouteDto {
    pub fn from_route(base: &KnowledgeBase, route: &Route, at: NaiveDateTime) -> Self {
        let stations = route
            .stations()
            .iter()
            .map(|id| StopDto {
                id: id.to_string(),
                name: base
                    .station(id.as_str())
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| id.to_string()),
            })
            .collect();

        let connections = route
            .connections()
            .iter()
            .map(|id| HopDto {
                origin: id.origin.to_string(),
                destination: id.destination.to_string(),
                line: id.line.to_string(),
                frequency_mins: base
                    .connection(id)
                    .and_then(|c| c.schedule.as_ref())
                    .and_then(|s| s.for_day(at.weekday()))
                    .and_then(|d| d.frequency_mins),
            })
            .collect();

        Self {
            stations,
            connections,
            lines: route.lines().iter().map(|l| l.to_string()).collect(),
            total_time_mins: route.total_time_mins(),
            total_distance_km: route.total_distance_km(),
            transfers: route.transfers(),
            cost: route.cost(),
        }
    }
}

/// Search work counters.
#[derive(Debug, Serialize)]
pub struct StatsDto {
    pub settled: usize,
    pub pushed: usize,
}

impl From<SearchStats> for StatsDto {
    fn from(stats: SearchStats) -> Self {
        Self {
            settled: stats.settled,
            pushed: stats.pushed,
        }
    }
}

/// Response for route planning.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// "found", "no_route" or "cancelled"
    pub outcome: String,

    pub route: Option<RouteDto>,

    /// Human-readable description
    pub narration: String,

    /// Rule entries skipped when the data was loaded
    pub warnings: Vec<String>,

    /// The time connections were evaluated at
    pub at: String,

    /// Knowledge base generation that answered the query
    pub generation: u64,

    pub stats: StatsDto,
}

impl RouteResponse {
    pub fn from_result(base: &KnowledgeBase, result: &SearchResult, generation: u64) -> Self {
        let narration = match &result.outcome {
            SearchOutcome::Found(route) => describe_route(base, Some(route)),
            SearchOutcome::NoRoute => NO_ROUTE_MESSAGE.to_string(),
            SearchOutcome::Cancelled => CANCELLED_MESSAGE.to_string(),
        };

        Self {
            outcome: result.outcome.to_string(),
            route: result
                .outcome
                .route()
                .map(|r| RouteDto::from_route(base, r, result.at)),
            narration,
            warnings: warning_strings(&result.warnings),
            at: result.at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            generation,
            stats: result.stats.into(),
        }
    }
}

fn warning_strings(warnings: &[RuleWarning]) -> Vec<String> {
    warnings.iter().map(|w| w.to_string()).collect()
}

/// A station in the station list.
#[derive(Debug, Serialize)]
pub struct StationDto {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub lines: Vec<String>,
    pub services: Vec<String>,
}

impl StationDto {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.to_string(),
            name: station.name.clone(),
            latitude: station.coordinates.latitude,
            longitude: station.coordinates.longitude,
            lines: station.lines.iter().map(|l| l.to_string()).collect(),
            services: station.services.iter().cloned().collect(),
        }
    }
}

/// Response listing every station.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub generation: u64,
    pub stations: Vec<StationDto>,
}

/// Response for a data reload.
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub generation: u64,
    pub stations: usize,
    pub connections: usize,
    pub rules: usize,
    pub warnings: Vec<String>,
}

impl ReloadResponse {
    pub fn new(summary: &LoadSummary, base: &KnowledgeBase) -> Self {
        Self {
            generation: summary.generation,
            stations: summary.stations,
            connections: summary.connections,
            rules: summary.rules,
            warnings: warning_strings(base.rule_warnings()),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
