//! Domain types for the transit network.
//!
//! This module contains the entity model: stations, lines, connections,
//! schedules, rules, preferences and routes. Types validate their
//! invariants at construction time, so code that receives them can trust
//! their validity.

mod connection;
mod error;
mod line;
mod preference;
mod route;
mod rule;
mod schedule;
mod station;
mod time;

pub use connection::{Connection, ConnectionId};
pub use error::DomainError;
pub use line::LineId;
pub use preference::{Criterion, Preference, Preferences, TRANSFER_AMPLIFICATION};
pub use route::{Metrics, Route};
pub use rule::{CongestionFactor, Rule, RuleWindow, ScheduledRule};
pub use schedule::{DaySchedule, Schedule};
pub use station::{Coordinates, Station, StationId};
pub use time::{TimeError, TimeWindow, clock_time, parse_weekday, weekday_name};
