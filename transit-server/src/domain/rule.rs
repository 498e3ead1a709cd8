//! Operational rules: closures, maintenance and congestion.
//!
//! Rules are plain data. The knowledge base evaluates them against a copy of
//! the connection set for each query; they are never mutated.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

use super::{DomainError, LineId, StationId, TimeWindow};

/// A congestion multiplier, always finite and greater than 1.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CongestionFactor(f64);

impl CongestionFactor {
    pub fn new(factor: f64) -> Result<Self, DomainError> {
        if !factor.is_finite() || factor <= 1.0 {
            return Err(DomainError::InvalidFactor(factor));
        }
        Ok(Self(factor))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Scale a travel time, rounding to the nearest whole minute.
    pub fn apply(&self, minutes: u32) -> u32 {
        (f64::from(minutes) * self.0).round() as u32
    }
}

/// The effect a rule has on the connection set.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Deactivate every connection starting or ending at the station.
    StationClosure { station: StationId },
    /// Deactivate every connection on the line.
    LineClosure { line: LineId },
    /// Deactivate the connections between two stations, in both directions.
    SegmentMaintenance {
        origin: StationId,
        destination: StationId,
    },
    /// Multiply travel times on the line.
    Congestion {
        line: LineId,
        factor: CongestionFactor,
    },
}

impl Rule {
    /// Tag used for this rule kind in input data and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::StationClosure { .. } => "closure_station",
            Rule::LineClosure { .. } => "closure_line",
            Rule::SegmentMaintenance { .. } => "maintenance_segment",
            Rule::Congestion { .. } => "congestion",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::StationClosure { station } => write!(f, "station {station} closed"),
            Rule::LineClosure { line } => write!(f, "line {line} closed"),
            Rule::SegmentMaintenance {
                origin,
                destination,
            } => write!(f, "segment {origin}-{destination} under maintenance"),
            Rule::Congestion { line, factor } => {
                write!(f, "line {line} congested (x{})", factor.value())
            }
        }
    }
}

/// When a rule is in force. Every component that is present must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleWindow {
    /// Days of the week; empty means every day.
    pub days: Vec<Weekday>,
    pub hours: Option<TimeWindow>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RuleWindow {
    /// A window that is always open.
    pub fn always() -> Self {
        Self::default()
    }

    pub fn is_open_at(&self, at: NaiveDateTime) -> bool {
        if !self.days.is_empty() && !self.days.contains(&at.weekday()) {
            return false;
        }
        if let Some(hours) = &self.hours {
            if !hours.contains(at.time()) {
                return false;
            }
        }
        let date = at.date();
        if self.start_date.is_some_and(|start| date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }
        true
    }
}

/// A validated rule together with the window in which it applies.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledRule {
    pub rule: Rule,
    pub window: RuleWindow,
    /// Free-text reason carried from the data, for display only.
    pub reason: Option<String>,
}

impl ScheduledRule {
    /// A rule that applies at all times.
    pub fn always(rule: Rule) -> Self {
        Self {
            rule,
            window: RuleWindow::always(),
            reason: None,
        }
    }

    pub fn applies_at(&self, at: NaiveDateTime) -> bool {
        self.window.is_open_at(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock_time;

    // 2023-06-05 is a Monday.
    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn factor_validation() {
        assert!(CongestionFactor::new(1.8).is_ok());
        assert!(CongestionFactor::new(1.0).is_err());
        assert!(CongestionFactor::new(0.5).is_err());
        assert!(CongestionFactor::new(f64::INFINITY).is_err());
        assert!(CongestionFactor::new(f64::NAN).is_err());
    }

    #[test]
    fn factor_rounds_to_nearest_minute() {
        let f = CongestionFactor::new(1.5).unwrap();
        assert_eq!(f.apply(5), 8); // 7.5 rounds up
        assert_eq!(f.apply(4), 6);
        let f = CongestionFactor::new(1.8).unwrap();
        assert_eq!(f.apply(7), 13); // 12.6
        assert_eq!(f.apply(0), 0);
    }

    #[test]
    fn kind_tags() {
        let line = LineId::parse("L1").unwrap();
        let rule = Rule::LineClosure { line: line.clone() };
        assert_eq!(rule.kind(), "closure_line");
        let rule = Rule::Congestion {
            line,
            factor: CongestionFactor::new(2.0).unwrap(),
        };
        assert_eq!(rule.kind(), "congestion");
        assert_eq!(rule.to_string(), "line L1 congested (x2)");
    }

    #[test]
    fn empty_window_always_open() {
        let window = RuleWindow::always();
        assert!(window.is_open_at(at(5, 0, 0)));
        assert!(window.is_open_at(at(11, 23, 59)));
    }

    #[test]
    fn day_and_hour_window() {
        let window = RuleWindow {
            days: vec![Weekday::Mon, Weekday::Tue],
            hours: Some(TimeWindow::new(
                clock_time(7, 0).unwrap(),
                clock_time(9, 0).unwrap(),
            )),
            ..RuleWindow::default()
        };
        assert!(window.is_open_at(at(5, 8, 0)));
        assert!(window.is_open_at(at(6, 7, 0)));
        assert!(!window.is_open_at(at(5, 10, 0)));
        // Wednesday
        assert!(!window.is_open_at(at(7, 8, 0)));
    }

    #[test]
    fn date_range_window() {
        let window = RuleWindow {
            start_date: NaiveDate::from_ymd_opt(2023, 6, 1),
            end_date: NaiveDate::from_ymd_opt(2023, 6, 15),
            ..RuleWindow::default()
        };
        assert!(window.is_open_at(at(1, 0, 0)));
        assert!(window.is_open_at(at(15, 23, 0)));
        assert!(!window.is_open_at(at(16, 0, 0)));
        let may = NaiveDate::from_ymd_opt(2023, 5, 31)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert!(!window.is_open_at(may));
    }
}
