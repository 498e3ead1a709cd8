//! Per-weekday operating schedules for connections.

use chrono::{Datelike, NaiveDateTime, Weekday};

use super::TimeWindow;

/// Operating hours for one day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySchedule {
    pub window: TimeWindow,
    /// Headway in minutes, when the data provides one.
    pub frequency_mins: Option<u32>,
}

/// Weekly schedule: an optional [`DaySchedule`] for each weekday.
///
/// Days without an entry place no restriction on the connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    days: [Option<DaySchedule>; 7],
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hours for a weekday, replacing any previous entry.
    pub fn set(&mut self, day: Weekday, hours: DaySchedule) {
        self.days[day.num_days_from_monday() as usize] = Some(hours);
    }

    /// Builder-style variant of [`Schedule::set`].
    pub fn with_day(mut self, day: Weekday, hours: DaySchedule) -> Self {
        self.set(day, hours);
        self
    }

    /// Hours for a weekday, if any are defined.
    pub fn for_day(&self, day: Weekday) -> Option<&DaySchedule> {
        self.days[day.num_days_from_monday() as usize].as_ref()
    }

    /// Returns true if the connection may run at `at`.
    ///
    /// A day with no entry is unrestricted; otherwise the clock time must
    /// fall inside that day's window.
    pub fn permits(&self, at: NaiveDateTime) -> bool {
        match self.for_day(at.weekday()) {
            Some(hours) => hours.window.contains(at.time()),
            None => true,
        }
    }

    /// Number of weekdays with defined hours.
    pub fn len(&self) -> usize {
        self.days.iter().filter(|d| d.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
